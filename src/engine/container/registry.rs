use crate::engine::container::{builtin_containers, Container, ContainerColor, ContainerId};
use crate::engine::errors::EngineError;
use crate::engine::storage::{keys, RecordStore};

/// Persisted container table (`containers/{id}`).
#[derive(Debug, Clone)]
pub struct ContainerRegistry {
    records: RecordStore,
}

impl ContainerRegistry {
    pub fn new(records: RecordStore) -> Self {
        Self { records }
    }

    /// Writes the built-in containers when the table is empty. Returns true
    /// when seeding happened.
    pub async fn seed_builtins(&self) -> Result<bool, EngineError> {
        if !self.records.keys_with_prefix(keys::CONTAINERS_PREFIX).await?.is_empty() {
            return Ok(false);
        }
        for (id, container) in builtin_containers() {
            self.records.set_record(&keys::container(&id), &container).await?;
        }
        log::info!("seeded built-in containers");
        Ok(true)
    }

    /// All containers, ordered by id.
    pub async fn list(&self) -> Result<Vec<(ContainerId, Container)>, EngineError> {
        let mut out = Vec::new();
        for key in self.records.keys_with_prefix(keys::CONTAINERS_PREFIX).await? {
            let Ok(id) = ContainerId::parse(&key[keys::CONTAINERS_PREFIX.len()..]) else {
                log::warn!("ignoring container record with invalid key {key}");
                continue;
            };
            if let Some(container) = self.records.get_record::<Container>(&key).await? {
                out.push((id, container));
            }
        }
        Ok(out)
    }

    pub async fn get(&self, id: &ContainerId) -> Result<Option<Container>, EngineError> {
        Ok(self.records.get_record(&keys::container(id)).await?)
    }

    pub async fn create(&self, container: Container) -> Result<ContainerId, EngineError> {
        let id = ContainerId::generate();
        self.records.set_record(&keys::container(&id), &container).await?;
        log::info!("created container {id} ({})", container.name);
        Ok(id)
    }

    /// Renames, recolours or re-icons a container. `None` fields stay as they are.
    pub async fn update(
        &self,
        id: &ContainerId,
        name: Option<String>,
        color: Option<ContainerColor>,
        icon: Option<String>,
    ) -> Result<Container, EngineError> {
        if id.is_default() {
            return Err(EngineError::DefaultContainerImmutable);
        }
        let mut container = self.get(id).await?.ok_or_else(|| EngineError::ContainerNotFound(id.clone()))?;
        if let Some(name) = name {
            container.name = name;
        }
        if let Some(color) = color {
            container.color = color;
        }
        if let Some(icon) = icon {
            container.icon = icon;
        }
        self.records.set_record(&keys::container(id), &container).await?;
        Ok(container)
    }

    pub async fn remove(&self, id: &ContainerId) -> Result<(), EngineError> {
        if id.is_default() {
            return Err(EngineError::DefaultContainerImmutable);
        }
        if self.get(id).await?.is_none() {
            return Err(EngineError::ContainerNotFound(id.clone()));
        }
        self.records.remove_record(&keys::container(id)).await?;
        log::info!("removed container {id}");
        Ok(())
    }
}
