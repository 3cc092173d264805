use crate::errors::AppError;
use crate::models::ResultType;
use deadpool_postgres::Object;
use tokio_postgres::Row;

pub struct ResultTypeRepository;

impl ResultTypeRepository {
    pub async fn list(client: &Object, satellite_id: Option<&str>) -> Result<Vec<ResultType>, AppError> {
        let rows = match satellite_id {
            Some(id) => {
                let sql = r#"
                    SELECT result_id, result_type, satellite_id
                    FROM result_type
                    WHERE satellite_id = $1
                    ORDER BY result_id
                "#;
                client.query(sql, &[&id]).await?
            }
            None => {
                let sql = r#"
                    SELECT result_id, result_type, satellite_id
                    FROM result_type
                    ORDER BY result_id
                "#;
                client.query(sql, &[]).await?
            }
        };

        log::debug!(
            "Loaded {} result types (satellite: {})",
            rows.len(),
            satellite_id.unwrap_or("any")
        );
        Ok(rows.iter().map(Self::build_result_type).collect())
    }

    fn build_result_type(row: &Row) -> ResultType {
        ResultType {
            result_id: row.get(0),
            result_type: row.get(1),
            satellite_id: row.get(2),
        }
    }
}
