//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_replace`] to assert behavior.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it receives the request the client sent and
/// answers through the request's oneshot channel, which makes success and
/// failure replies deterministic.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Replace request
pub async fn expect_replace<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Replace { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<bool, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CatalogClient;
    use crate::domain::Product;
    use crate::product_actor::CatalogError;

    #[tokio::test]
    async fn test_add_product_sends_blank_payload() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = CatalogClient::new(inner);

        let add_task = tokio::spawn(async move { client.add_product().await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert!(payload.name.is_empty());
        assert!(payload.description.is_empty());
        responder.send(Ok("product-1".to_string())).unwrap();

        assert_eq!(add_task.await.unwrap(), Ok("product-1".to_string()));
    }

    #[tokio::test]
    async fn test_capacity_rejection_is_surfaced() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = CatalogClient::new(inner);

        let add_task = tokio::spawn(async move { client.add_product().await });

        let (_, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        responder.send(Err(FrameworkError::CapacityExceeded { capacity: 100 })).unwrap();

        assert_eq!(add_task.await.unwrap(), Err(CatalogError::CapacityExceeded { capacity: 100 }));
    }

    #[tokio::test]
    async fn test_update_of_unknown_product_reports_false() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = CatalogClient::new(inner);

        let update_task = tokio::spawn(async move {
            client.update_product(Product::new("product-7", "Widget")).await
        });

        let (item, responder) = expect_replace(&mut receiver).await.expect("Expected Replace request");
        assert_eq!(item.id, "product-7");
        responder.send(Ok(None)).unwrap();

        assert_eq!(update_task.await.unwrap(), Ok(false));
    }

    #[tokio::test]
    async fn test_dropped_actor_is_a_communication_error() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = CatalogClient::new(inner);

        let remove_task = tokio::spawn(async move { client.remove_product("product-1".into()).await });

        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, "product-1");
        drop(responder);

        assert!(matches!(
            remove_task.await.unwrap(),
            Err(CatalogError::ActorCommunicationError(_))
        ));
    }
}
