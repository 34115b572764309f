use async_trait::async_trait;
use folio_application::ResourceRepository;
use folio_core::AppResult;
use folio_domain::ResourcePath;

use super::InMemoryContentRepository;

#[async_trait]
impl ResourceRepository for InMemoryContentRepository {
    async fn resource_exists(&self, resource: &ResourcePath) -> AppResult<bool> {
        Ok(self.resources.read().await.contains_key(resource))
    }

    async fn read_ancestor_chain(&self, resource: &ResourcePath) -> AppResult<Vec<ResourcePath>> {
        let resources = self.resources.read().await;

        Ok(resource
            .ancestors()
            .into_iter()
            .filter(|folder| resources.contains_key(folder))
            .collect())
    }

    async fn read_siblings(&self, resource: &ResourcePath) -> AppResult<Vec<ResourcePath>> {
        let resources = self.resources.read().await;
        let Some(content_id) = resources.get(resource) else {
            return Ok(Vec::new());
        };

        Ok(resources
            .iter()
            .filter_map(|(other, other_content_id)| {
                (other != resource && other_content_id == content_id).then(|| other.clone())
            })
            .collect())
    }
}
