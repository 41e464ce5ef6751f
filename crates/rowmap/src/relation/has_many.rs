use super::{downcast, Relation};
use crate::{Model, Result};

use std::{any::Any, fmt};

/// Related records in `Id` order, resolved on request.
#[derive(Clone)]
pub struct HasMany<T> {
    values: Option<Vec<T>>,
}

impl<T: Model> HasMany<T> {
    #[track_caller]
    pub fn get(&self) -> &[T] {
        self.values
            .as_ref()
            .expect("association not loaded")
            .as_slice()
    }
}

impl<T> HasMany<T> {
    pub fn is_loaded(&self) -> bool {
        self.values.is_some()
    }
}

impl<T: Model> Relation for HasMany<T> {
    fn assign(&mut self, records: Vec<Box<dyn Any + Send + Sync>>) -> Result<()> {
        let values = records
            .into_iter()
            .map(|record| downcast::<T>(record).map(|record| *record))
            .collect::<Result<_>>()?;

        self.values = Some(values);
        Ok(())
    }

    fn unload(&mut self) {
        self.values = None;
    }

    fn is_loaded(&self) -> bool {
        self.values.is_some()
    }
}

impl<T> Default for HasMany<T> {
    fn default() -> Self {
        Self { values: None }
    }
}

impl<T: fmt::Debug> fmt::Debug for HasMany<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            Some(values) => fmt.debug_list().entries(values).finish(),
            None => write!(fmt, "<not loaded>"),
        }
    }
}
