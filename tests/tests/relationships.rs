use pretty_assertions::assert_eq;
use rowmap::{Db, Relation};
use std_util::prelude::*;
use tests::{models::*, models, setup, ExecKind};

async fn company() -> (Db, tests::ExecLog) {
    setup(models!(Department, Employee, Project, EmployeeProject)).await
}

async fn school() -> (Db, tests::ExecLog) {
    setup(models!(Address, Student, Course, StudentCourse, Assignment)).await
}

#[tokio::test]
async fn one_to_one_resolves_referenced_record() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let user_id = db.save(&mut User::new("ada", "ada@example.com")).await.unwrap();
    let post_id = db.save(&mut Post::new(user_id, "hello")).await.unwrap();

    let post: Post = assert_some!(db.find_by_id(post_id, false).await.unwrap());
    assert!(!post.user.is_loaded());

    let post: Post = assert_some!(db.find_by_id(post_id, true).await.unwrap());
    let user = assert_some!(post.user.get());
    assert_eq!(user.meta.id(), Some(user_id));
    assert_eq!(user.user_name, "ada");

    // Related records are loaded one level deep
    assert!(!user.posts.is_loaded());

    let mut post = post;
    post.user.unload();
    assert!(!post.user.is_loaded());
}

#[tokio::test]
async fn missing_one_to_one_resolves_to_none() {
    let (mut db, _log) = school().await;

    let id = db.save(&mut Student::new("Ada", None)).await.unwrap();

    let student: Student = assert_some!(db.find_by_id(id, true).await.unwrap());
    assert!(student.address.is_loaded());
    assert_none!(student.address.get());
    assert!(student.courses.get().is_empty());
    assert!(student.assignments.get().is_empty());
}

#[tokio::test]
async fn one_to_many_returns_exactly_the_children() {
    let (mut db, _log) = company().await;

    let mut engineering = Department {
        name: "Engineering".to_string(),
        ..Department::default()
    };
    let engineering_id = db.save(&mut engineering).await.unwrap();

    let mut sales = Department {
        name: "Sales".to_string(),
        ..Department::default()
    };
    let sales_id = db.save(&mut sales).await.unwrap();

    for (first, department) in [("Ada", engineering_id), ("Grace", engineering_id), ("Joan", sales_id)] {
        let mut employee = Employee::new(first, "Smith", 100_000);
        employee.department_id = Some(department);
        db.save(&mut employee).await.unwrap();
    }

    let department: Department = assert_some!(db.find_by_id(engineering_id, true).await.unwrap());
    let names: Vec<_> = department
        .employees
        .get()
        .iter()
        .map(|e| e.first_name.as_str())
        .collect();
    assert_eq!(names, ["Ada", "Grace"]);
    assert_none!(department.head_employee.get());
}

#[tokio::test]
async fn many_to_many_has_no_duplicates() {
    let (mut db, _log) = company().await;

    let ada = db.save(&mut Employee::new("Ada", "Lovelace", 120_000)).await.unwrap();
    let grace = db.save(&mut Employee::new("Grace", "Hopper", 130_000)).await.unwrap();

    let compiler = db.save(&mut Project::new("Compiler", 50_000)).await.unwrap();
    let engine = db.save(&mut Project::new("Engine", 80_000)).await.unwrap();
    let _unrelated = db.save(&mut Project::new("Loom", 10_000)).await.unwrap();

    for (employee, project, role) in [
        (ada, compiler, "lead"),
        (ada, engine, "lead"),
        (ada, engine, "reviewer"),
        (grace, compiler, "developer"),
    ] {
        db.save(&mut EmployeeProject::new(employee, project, role))
            .await
            .unwrap();
    }

    let employee: Employee = assert_some!(db.find_by_id(ada, true).await.unwrap());
    let projects: Vec<_> = employee.projects.get().iter().map(|p| p.meta.id()).collect();
    assert_eq!(projects, [Some(compiler), Some(engine)]);

    let project: Project = assert_some!(db.find_by_id(compiler, true).await.unwrap());
    let team: Vec<_> = project
        .team_members
        .get()
        .iter()
        .map(|e| e.first_name.as_str())
        .collect();
    assert_eq!(team, ["Ada", "Grace"]);
}

#[tokio::test]
async fn self_reference_resolves_both_directions() {
    let (mut db, _log) = company().await;

    let boss = db.save(&mut Employee::new("Grace", "Hopper", 200_000)).await.unwrap();

    let mut report = Employee::new("Ada", "Lovelace", 100_000);
    report.supervisor_id = Some(boss);
    let report = db.save(&mut report).await.unwrap();

    let employee: Employee = assert_some!(db.find_by_id(report, true).await.unwrap());
    let supervisor = assert_some!(employee.supervisor.get());
    assert_eq!(supervisor.meta.id(), Some(boss));
    assert_eq!(supervisor.first_name, "Grace");
    assert_none!(employee.department.get());

    let supervisor: Employee = assert_some!(db.find_by_id(boss, true).await.unwrap());
    assert_none!(supervisor.supervisor.get());
    let subordinates: Vec<_> = supervisor
        .subordinates
        .get()
        .iter()
        .map(|e| e.meta.id())
        .collect();
    assert_eq!(subordinates, [Some(report)]);
}

#[tokio::test]
async fn one_to_one_relationships_share_one_query() {
    let (mut db, log) = company().await;

    let department = db
        .save(&mut Department {
            name: "Research".to_string(),
            ..Department::default()
        })
        .await
        .unwrap();
    let boss = db.save(&mut Employee::new("Grace", "Hopper", 200_000)).await.unwrap();

    let mut employee = Employee::new("Ada", "Lovelace", 100_000);
    employee.department_id = Some(department);
    employee.supervisor_id = Some(boss);
    let id = db.save(&mut employee).await.unwrap();

    log.clear();
    let employee: Employee = assert_some!(db.find_by_id(id, true).await.unwrap());
    assert_eq!(assert_some!(employee.department.get()).name, "Research");
    assert_eq!(assert_some!(employee.supervisor.get()).first_name, "Grace");

    // Department and supervisor in one joined query, then subordinates and
    // projects
    assert_eq!(log.count(|op| op.sql.contains(" LEFT JOIN ")), 1);
    assert_eq!(log.count_kind(ExecKind::Query), 3);
    assert_eq!(log.count_kind(ExecKind::Scalar), 1);
}

#[tokio::test]
async fn school_relationships() {
    let (mut db, _log) = school().await;

    let address = db.save(&mut Address::new("1 Main St", "Springfield")).await.unwrap();
    let student = db.save(&mut Student::new("Ada", Some(address))).await.unwrap();
    let other = db.save(&mut Student::new("Grace", None)).await.unwrap();

    let math = db.save(&mut Course::new("MATH101", "Calculus")).await.unwrap();
    let cs = db.save(&mut Course::new("CS101", "Programming")).await.unwrap();

    db.save(&mut StudentCourse::new(student, math)).await.unwrap();
    db.save(&mut StudentCourse::new(student, cs)).await.unwrap();
    db.save(&mut StudentCourse::new(other, cs)).await.unwrap();

    db.save(&mut Assignment::new(student, "Limits")).await.unwrap();
    db.save(&mut Assignment::new(student, "Loops")).await.unwrap();
    db.save(&mut Assignment::new(other, "Recursion")).await.unwrap();

    let found: Student = assert_some!(db.find_by_id(student, true).await.unwrap());
    assert_eq!(assert_some!(found.address.get()).city, "Springfield");

    let codes: Vec<_> = found.courses.get().iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, ["MATH101", "CS101"]);

    let titles: Vec<_> = found
        .assignments
        .get()
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(titles, ["Limits", "Loops"]);
}

#[tokio::test]
async fn find_all_resolves_every_record() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let ada = db.save(&mut User::new("ada", "ada@example.com")).await.unwrap();
    let grace = db.save(&mut User::new("grace", "grace@example.com")).await.unwrap();
    db.save(&mut Post::new(ada, "one")).await.unwrap();
    db.save(&mut Post::new(ada, "two")).await.unwrap();

    let users: Vec<User> = db.find_all(true).await.unwrap();
    let counts: Vec<_> = users
        .iter()
        .map(|u| (u.meta.id(), u.posts.get().len()))
        .collect();
    assert_eq!(counts, [(Some(ada), 2), (Some(grace), 0)]);

    // The cached copies are never resolved
    let cached: User = assert_some!(db.cache().get("test_users", ada));
    assert!(!cached.posts.is_loaded());
}

#[tokio::test]
async fn foreign_key_suffix_is_configurable() {
    let mut builder = models!(User, Post);
    builder.foreign_key_suffix("Id");

    let err = assert_err!(builder.build_registry());
    assert!(err.is_configuration(), "{err}");
}
