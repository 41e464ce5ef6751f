use super::{downcast, Relation};
use crate::{Model, Result};

use std::{any::Any, fmt};

/// At most one related record, resolved on request.
#[derive(Clone)]
pub struct HasOne<T> {
    value: Option<Option<Box<T>>>,
}

impl<T: Model> HasOne<T> {
    /// The related record, or `None` if there is none.
    ///
    /// Panics if the relationship has not been loaded.
    #[track_caller]
    pub fn get(&self) -> Option<&T> {
        self.value
            .as_ref()
            .expect("association not loaded")
            .as_deref()
    }
}

impl<T> HasOne<T> {
    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: Model> Relation for HasOne<T> {
    fn assign(&mut self, records: Vec<Box<dyn Any + Send + Sync>>) -> Result<()> {
        let mut records = records.into_iter();
        let value = records.next().map(downcast::<T>).transpose()?;

        if records.next().is_some() {
            return Err(rowmap_core::Error::configuration(format!(
                "one-to-one relationship to `{}` resolved to several records",
                T::TABLE_NAME
            )));
        }

        self.value = Some(value);
        Ok(())
    }

    fn unload(&mut self) {
        self.value = None;
    }

    fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

impl<T> Default for HasOne<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: fmt::Debug> fmt::Debug for HasOne<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(Some(t)) => t.fmt(fmt),
            Some(None) => write!(fmt, "None"),
            None => write!(fmt, "<not loaded>"),
        }
    }
}
