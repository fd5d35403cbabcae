pub const SQL_TABLEN_SALES : &str = "sales";
// PRIMARY implies NOT NULL and UNIQUE; rowid alias, assigned on insert
pub const SQL_CREATE_SALES : &str =
"CREATE TABLE sales (
    id INTEGER PRIMARY KEY,
    product TEXT NOT NULL,
    amount REAL,
    sale_date DATE
    )";

pub const SQL_INSERT_SALE : &str =
"INSERT INTO sales (product, amount, sale_date) VALUES (?1, ?2, ?3)";

pub const SQL_SELECT_SALES : &str =
"SELECT id, product, amount, sale_date FROM sales ORDER BY id ASC";
