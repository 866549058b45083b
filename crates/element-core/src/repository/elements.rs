use crate::error::CoreError;
use crate::models::Element;
use crate::repository::{ElementNode, SqliteRepository};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::ElementRepository for SqliteRepository {
    async fn add_element(
        &self,
        name: String,
        parent: Option<String>,
        color: Option<String>,
    ) -> Result<Element, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Element name cannot be empty.".to_string(),
            ));
        }

        let parent_id = match &parent {
            Some(parent_name) => Some(
                self.find_element_by_name(parent_name)
                    .await?
                    .map(|e| e.id)
                    .ok_or_else(|| CoreError::NotFound(parent_name.clone()))?,
            ),
            None => None,
        };

        if self.find_element_by_name(&name).await?.is_some() {
            return Err(CoreError::InvalidInput(format!(
                "An element named '{}' already exists.",
                name
            )));
        }

        let element = Element {
            id: Uuid::now_v7(),
            name,
            parent_id,
            color,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO elements (id, name, parent_id, color, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(element.id)
        .bind(&element.name)
        .bind(element.parent_id)
        .bind(&element.color)
        .bind(element.created_at)
        .execute(self.pool())
        .await?;

        Ok(element)
    }

    async fn find_element_by_name(&self, name: &str) -> Result<Option<Element>, CoreError> {
        let element = sqlx::query_as("SELECT * FROM elements WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(element)
    }

    async fn element_tree(&self) -> Result<Vec<ElementNode>, CoreError> {
        let nodes = sqlx::query_as(
            r#"WITH RECURSIVE element_tree (id, name, parent_id, color, created_at, depth, path) AS (
                SELECT e.id, e.name, e.parent_id, e.color, e.created_at,
                    0 AS depth,
                    e.name AS path
                FROM elements e
                WHERE e.parent_id IS NULL
                UNION ALL
                SELECT e.id, e.name, e.parent_id, e.color, e.created_at,
                    et.depth + 1,
                    et.path || ' / ' || e.name
                FROM elements e
                JOIN element_tree et ON e.parent_id = et.id
            )
            SELECT id, name, parent_id, color, created_at, depth
            FROM element_tree
            ORDER BY path"#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(nodes)
    }

    async fn move_element(
        &self,
        name: &str,
        new_parent: Option<&str>,
    ) -> Result<Element, CoreError> {
        let element = self
            .find_element_by_name(name)
            .await?
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;

        let new_parent_id = match new_parent {
            Some(parent_name) => {
                let parent = self
                    .find_element_by_name(parent_name)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(parent_name.to_string()))?;
                self.ensure_no_cycle(&element, &parent).await?;
                Some(parent.id)
            }
            None => None,
        };

        let moved: Element = sqlx::query_as(
            "UPDATE elements SET parent_id = $1 WHERE id = $2 RETURNING *",
        )
        .bind(new_parent_id)
        .bind(element.id)
        .fetch_one(self.pool())
        .await?;

        Ok(moved)
    }

    async fn delete_element(&self, name: &str) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM elements WHERE name = $1")
            .bind(name)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

impl SqliteRepository {
    /// Walks up from `candidate_parent`; nesting `element` under one of its
    /// own descendants (or itself) would orphan the subtree.
    async fn ensure_no_cycle(
        &self,
        element: &Element,
        candidate_parent: &Element,
    ) -> Result<(), CoreError> {
        let mut cursor = Some(candidate_parent.clone());
        while let Some(current) = cursor {
            if current.id == element.id {
                return Err(CoreError::ElementCycle(
                    element.name.clone(),
                    candidate_parent.name.clone(),
                ));
            }
            cursor = match current.parent_id {
                Some(parent_id) => {
                    sqlx::query_as("SELECT * FROM elements WHERE id = $1")
                        .bind(parent_id)
                        .fetch_optional(self.pool())
                        .await?
                }
                None => None,
            };
        }
        Ok(())
    }
}
