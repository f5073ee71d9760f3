#![allow(dead_code)]

use tabula_engine::{Database, Response, Table};

/// Executes a statement that must succeed and returns the response.
pub fn exec(db: &mut Database, sql: &str) -> Response {
    db.execute(sql)
        .unwrap_or_else(|e| panic!("Failed to execute: {sql}\nError: {e}"))
}

/// Executes a statement that must fail and returns the message.
pub fn exec_err(db: &mut Database, sql: &str) -> String {
    db.execute(sql)
        .err()
        .unwrap_or_else(|| panic!("Expected error for: {sql}"))
        .to_string()
}

/// Unwraps a table response.
pub fn table(response: Response) -> Table {
    match response {
        Response::Table(table) => table,
        Response::Message(message) => panic!("Expected a table, got message: {message}"),
    }
}

/// A database with the employee table of the company dataset.
pub fn company_employees() -> Database {
    let mut db = Database::new();
    exec(
        &mut db,
        "CREATE TABLE employee (
           emp_id INT PRIMARY KEY,
           first_name VARCHAR(20),
           last_name VARCHAR(20),
           sex VARCHAR(1),
           salary INT,
           super_id INT)",
    );
    exec(
        &mut db,
        "INSERT INTO employee(emp_id, first_name, last_name, sex, salary, super_id)
         VALUES(184, John, Corner, M, 100000, NULL)",
    );
    exec(
        &mut db,
        "INSERT INTO employee(emp_id, first_name, last_name, sex, salary, super_id)
         VALUES(348, Boba, Fat, M, 80000, 184)",
    );
    exec(
        &mut db,
        "INSERT INTO employee(emp_id, first_name, last_name, sex, salary, super_id)
         VALUES(235, Ray, Skytalker, F, 60000, 348)",
    );
    db
}

/// A database with employee and branch tables wired for joins.
pub fn company() -> Database {
    let mut db = Database::new();
    exec(
        &mut db,
        "CREATE TABLE employee (
           emp_id INT PRIMARY KEY,
           first_name VARCHAR(40),
           last_name VARCHAR(40),
           sex VARCHAR(1),
           salary INT,
           super_id INT,
           branch_id INT)",
    );
    exec(
        &mut db,
        "CREATE TABLE branch (
           branch_id INT PRIMARY KEY,
           branch_name VARCHAR(40),
           mgr_id INT)",
    );
    let employees = [
        "VALUES(100, 'David', 'Wallace', 'M', 250000, NULL, NULL)",
        "VALUES(101, 'Jan', 'Levinson', 'F', 110000, 100, 1)",
        "VALUES(102, 'Michael', 'Scott', 'M', 75000, 100, 1)",
        "VALUES(103, 'Angela', 'Martin', 'F', 63000, 102, 2)",
        "VALUES(104, 'Kelly', 'Kapoor', 'F', 55000, 102, 2)",
        "VALUES(106, 'Josh', 'Porter', 'M', 78000, 100, 3)",
    ];
    for values in employees {
        exec(
            &mut db,
            &format!(
                "INSERT INTO employee(emp_id, first_name, last_name, sex, salary, super_id, branch_id) {values}"
            ),
        );
    }
    let branches = [
        "VALUES(1, 'Corporate', 100)",
        "VALUES(2, 'Scranton', 102)",
        "VALUES(3, 'Stamford', 106)",
        "VALUES(4, 'Houston', 110)",
    ];
    for values in branches {
        exec(
            &mut db,
            &format!("INSERT INTO branch(branch_id, branch_name, mgr_id) {values}"),
        );
    }
    db
}
