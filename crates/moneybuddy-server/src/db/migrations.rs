use rusqlite::Connection;

const SCHEMA: &str = include_str!("schema.sql");

const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Daily goods",
    "Transport",
    "Utilities",
    "Entertainment",
    "Medical",
    "Other",
];

pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Seed reference data only on a fresh database so renamed categories survive restarts
    let categories: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if categories == 0 {
        let mut stmt = conn.prepare("INSERT INTO categories (name) VALUES (?1)")?;
        for name in DEFAULT_CATEGORIES {
            stmt.execute([name])?;
        }
    }

    Ok(())
}
