use sqlx::PgConnection;

/// SQLSTATE for "string data, right truncation": the DNI didn't fit its
/// column.
const SQLSTATE_STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// A declared invariant an insert would have broken, as reported by the
/// storage engine.
#[derive(Debug, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// The unique index on dni. A race between two concurrent registrations
    /// of the same DNI is resolved here, by the engine rejecting the second
    /// insert, not by application-level locking.
    Uniqueness,

    /// The dni column's length limit.
    Length,
}

/// Why an insert failed.
#[derive(Debug)]
pub enum InsertError {
    /// The row broke a declared constraint.
    Constraint(ConstraintViolation),

    /// Any other driver or connectivity error.
    Other(sqlx::Error),
}

/// Insert one registered user. The statement is parameterized; user input
/// never reaches the SQL text.
///
/// ## Errors
///
/// Constraint violations come back as typed [`ConstraintViolation`]s so
/// callers never have to match on driver-specific codes; anything else is
/// passed through as [`InsertError::Other`].
pub async fn insert_user(
    conn: &mut PgConnection,
    nombre: &str,
    dni: &str,
    foto: &[u8],
) -> Result<(), InsertError> {
    sqlx::query("INSERT INTO users (nombre, dni, foto) VALUES ($1, $2, $3)")
        .bind(nombre)
        .bind(dni)
        .bind(foto)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(InsertError::from)
}

impl From<sqlx::Error> for InsertError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return Self::Constraint(ConstraintViolation::Uniqueness);
            }

            if db_err.code().as_deref() == Some(SQLSTATE_STRING_DATA_RIGHT_TRUNCATION) {
                return Self::Constraint(ConstraintViolation::Length);
            }
        }

        Self::Other(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sqlx::{PgPool, Row};

    #[test_log::test(sqlx::test)]
    #[ignore = "needs a running Postgres (set DATABASE_URL)"]
    async fn stored_bytes_read_back_unchanged(pool: PgPool) {
        let foto = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 255, 7];

        let mut conn = pool.acquire().await.unwrap();
        insert_user(&mut conn, "Juan Perez", "12345678", &foto)
            .await
            .unwrap();

        let row = sqlx::query("SELECT foto FROM users WHERE dni = $1")
            .bind("12345678")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(row.get::<Vec<u8>, _>("foto"), foto);
    }

    #[test_log::test(sqlx::test)]
    #[ignore = "needs a running Postgres (set DATABASE_URL)"]
    async fn a_duplicate_dni_is_a_uniqueness_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();

        insert_user(&mut conn, "Juan Perez", "12345678", &[1])
            .await
            .unwrap();

        let err = insert_user(&mut conn, "Otra Persona", "12345678", &[2])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InsertError::Constraint(ConstraintViolation::Uniqueness)
        ));
    }

    #[test_log::test(sqlx::test)]
    #[ignore = "needs a running Postgres (set DATABASE_URL)"]
    async fn an_overlong_dni_is_a_length_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();

        // nine characters; the handler's length check would normally stop
        // this before it reaches the column
        let err = insert_user(&mut conn, "Juan Perez", "123456789", &[1])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InsertError::Constraint(ConstraintViolation::Length)
        ));
    }
}
