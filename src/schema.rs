/// Storage mapping of a record type, kept apart from the record struct itself.
#[derive(Debug)]
pub struct TableMapping {
    pub name: &'static str,
    pub columns: &'static [Column],
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub definition: &'static str,
    pub indexed: bool,
}

pub const EMPLOYEE_TABLE: TableMapping = TableMapping {
    name: "employee_account",
    columns: &[
        Column {
            name: "id",
            definition: "INTEGER NOT NULL PRIMARY KEY",
            indexed: false,
        },
        Column {
            name: "fullname",
            definition: "VARCHAR(80) NOT NULL",
            indexed: true,
        },
        Column {
            name: "birth_date",
            definition: "DATE NOT NULL",
            indexed: false,
        },
        Column {
            name: "gender",
            definition: "VARCHAR(6) NOT NULL",
            indexed: false,
        },
    ],
};

impl TableMapping {
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.definition))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({columns})", self.name)
    }

    pub fn create_index_sql(&self) -> impl Iterator<Item = String> + '_ {
        self.columns.iter().filter(|c| c.indexed).map(|c| {
            format!(
                "CREATE INDEX IF NOT EXISTS ix_{table}_{column} ON {table} ({column})",
                table = self.name,
                column = c.name
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_employee_ddl() {
        let sql = EMPLOYEE_TABLE.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS employee_account ("));
        assert!(sql.contains("id INTEGER NOT NULL PRIMARY KEY"));
        assert!(sql.contains("birth_date DATE NOT NULL"));

        let indices: Vec<String> = EMPLOYEE_TABLE.create_index_sql().collect();
        assert_eq!(
            indices,
            vec![
                "CREATE INDEX IF NOT EXISTS ix_employee_account_fullname ON employee_account (fullname)"
                    .to_string()
            ]
        );
    }
}
