use crate::errors::AppError;
use crate::models::Area;
use deadpool_postgres::Object;

pub struct AreaRepository;

impl AreaRepository {
    pub async fn get_by_id(client: &Object, area_id: &str) -> Result<Option<Area>, AppError> {
        let sql = r#"
            SELECT area_id, area_name, date_min, date_max
            FROM area
            WHERE area_id = $1
        "#;

        let row = client.query_opt(sql, &[&area_id]).await?;
        Ok(row.map(|r| Area {
            area_id: r.get(0),
            area_name: r.get(1),
            date_min: r.get(2),
            date_max: r.get(3),
        }))
    }
}
