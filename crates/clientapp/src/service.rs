//! # Service Layer
//!
//! [`ClientService`] sits between the transport and the repository. It takes
//! wire-level requests, validates them into typed inputs, and delegates. It does
//! no I/O of its own and knows nothing about HTTP status codes; callers classify
//! failures through [`ClientError`].
//!
//! Ids arrive as strings. A string that is not a UUID cannot match any stored
//! record, so it is reported as [`ClientError::NotFound`] rather than as a
//! validation failure.

use crate::dto::{CreateClientRequest, UpdateClientRequest};
use crate::error::{ClientError, Result};
use crate::model::Client;
use crate::repository::ClientRepository;
use crate::store::StorageBackend;
use uuid::Uuid;

pub struct ClientService<B: StorageBackend> {
    repository: ClientRepository<B>,
}

impl<B: StorageBackend> ClientService<B> {
    pub fn new(repository: ClientRepository<B>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &ClientRepository<B> {
        &self.repository
    }

    pub fn create_client(&self, request: CreateClientRequest) -> Result<Client> {
        let draft = request.validate()?;
        self.repository.create(draft)
    }

    pub fn get_all_clients(&self) -> Result<Vec<Client>> {
        self.repository.get_all()
    }

    pub fn get_client(&self, id: &str) -> Result<Client> {
        let id = parse_id(id)?;
        self.repository.get_by_id(&id)
    }

    pub fn update_client(&self, id: &str, request: UpdateClientRequest) -> Result<Client> {
        let patch = request.validate()?;
        let id = parse_id(id)?;
        self.repository.update(&id, patch)
    }

    pub fn delete_client(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        self.repository.delete(&id)
    }

    pub fn client_count(&self) -> Result<usize> {
        self.repository.count()
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| ClientError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn make_service() -> ClientService<MemBackend> {
        ClientService::new(ClientRepository::new(MemBackend::new()))
    }

    fn create_request(name: &str, age: i64) -> CreateClientRequest {
        CreateClientRequest {
            name: name.into(),
            last_name: "Doe".into(),
            age,
        }
    }

    #[test]
    fn test_create_validates_before_persisting() {
        let service = make_service();
        let err = service.create_client(create_request("", 30)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.client_count().unwrap(), 0);
        assert_eq!(service.repository().backend().save_count(), 0);
    }

    #[test]
    fn test_create_and_fetch_by_string_id() {
        let service = make_service();
        let created = service.create_client(create_request("John", 30)).unwrap();
        let fetched = service.get_client(&created.id.to_string()).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let service = make_service();
        let err = service.get_client("not-a-uuid").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Client with ID not-a-uuid not found");

        assert!(service.delete_client("42").unwrap_err().is_not_found());
        assert!(service
            .update_client("42", UpdateClientRequest::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_rejects_invalid_fields_without_writing() {
        let service = make_service();
        let created = service.create_client(create_request("John", 30)).unwrap();
        let saves = service.repository().backend().save_count();

        let err = service
            .update_client(
                &created.id.to_string(),
                UpdateClientRequest {
                    age: Some(151),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(service.repository().backend().save_count(), saves);
        assert_eq!(service.get_client(&created.id.to_string()).unwrap().age, 30);
    }

    #[test]
    fn test_update_is_partial() {
        let service = make_service();
        let created = service.create_client(create_request("John", 30)).unwrap();

        let updated = service
            .update_client(
                &created.id.to_string(),
                UpdateClientRequest {
                    last_name: Some("Smith".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "John");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.age, 30);
    }

    #[test]
    fn test_delete_then_list() {
        let service = make_service();
        let a = service.create_client(create_request("A", 1)).unwrap();
        let b = service.create_client(create_request("B", 2)).unwrap();

        service.delete_client(&a.id.to_string()).unwrap();

        assert_eq!(service.get_all_clients().unwrap(), vec![b]);
    }
}
