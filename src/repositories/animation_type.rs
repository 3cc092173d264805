use crate::errors::AppError;
use crate::models::AnimationType;
use deadpool_postgres::Object;

pub struct AnimationTypeRepository;

impl AnimationTypeRepository {
    pub async fn list(client: &Object) -> Result<Vec<AnimationType>, AppError> {
        let sql = "SELECT type_id, type_name FROM animation_type ORDER BY type_id";

        let rows = client.query(sql, &[]).await?;
        Ok(rows
            .iter()
            .map(|row| AnimationType {
                type_id: row.get(0),
                type_name: row.get(1),
            })
            .collect())
    }
}
