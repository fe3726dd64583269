//! # Store Resolution
//!
//! Decides which store's credentials an adapter loads. The host platform
//! supplies three capabilities:
//!
//! - [`RequestParams`]: the current web request's parameters.
//! - [`OrderRepository`]: order lookup by entity id.
//! - [`StoreDirectory`]: the platform's default store view.
//!
//! [`OrderStoreResolver`] composes them: the `order_id` request parameter
//! selects an order, and that order's store wins. An order that cannot be
//! found (non-numeric id, unknown order, never-persisted order) falls back
//! to the default store. Resolution fails when the request carries no
//! order id at all (absent, blank or `0`), when the platform has no default
//! store, or when the order backend itself errored.

use std::collections::HashMap;

use storegate_core::{OrderId, StoreId};

/// Request parameter that carries the order entity id.
pub const ORDER_ID_PARAM: &str = "order_id";

/// Errors resolving the acting store.
#[derive(Debug, thiserror::Error)]
pub enum StoreResolutionError {
    /// The platform reports no default store view.
    #[error("default store view not found")]
    DefaultStoreNotFound,

    /// The request has no usable `order_id` parameter (absent, blank or `0`).
    #[error("request parameter order_id is missing")]
    MissingOrderId,

    /// The order backend failed while looking up the request's order.
    #[error("order lookup failed for order {order_id}: {source}")]
    OrderLookup {
        /// Order that was being looked up.
        order_id: OrderId,
        /// Backend failure.
        source: OrderLookupError,
    },
}

/// Errors from an [`OrderRepository`].
#[derive(Debug, thiserror::Error)]
pub enum OrderLookupError {
    /// No order exists with the requested id.
    #[error("order {0} does not exist")]
    NotFound(OrderId),

    /// The order store could not answer.
    #[error("order backend unavailable: {reason}")]
    Backend {
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// A sales order as seen by store resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Persisted entity id. `None` or `0` for an order that was never saved.
    pub entity_id: Option<u64>,
    /// Store the order was placed in.
    pub store_id: StoreId,
}

impl Order {
    /// Whether the order carries a persisted identity.
    pub fn has_identity(&self) -> bool {
        matches!(self.entity_id, Some(id) if id > 0)
    }
}

/// Parameters of the current web request.
pub trait RequestParams {
    /// The value of parameter `name`, if present.
    fn param(&self, name: &str) -> Option<String>;
}

impl RequestParams for HashMap<String, String> {
    fn param(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Order lookup by entity id.
pub trait OrderRepository: Send + Sync {
    /// Load the order with entity id `id`.
    fn get(&self, id: OrderId) -> Result<Order, OrderLookupError>;
}

/// The platform's store registry.
pub trait StoreDirectory: Send + Sync {
    /// The default store view, or `None` if the platform has none.
    fn default_store_id(&self) -> Option<StoreId>;
}

/// Resolves the store whose credentials an adapter loads.
pub trait StoreResolver {
    /// The acting store id.
    fn resolve_store_id(&self) -> Result<StoreId, StoreResolutionError>;
}

/// Always resolves to one fixed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStoreResolver(pub StoreId);

impl StoreResolver for FixedStoreResolver {
    fn resolve_store_id(&self) -> Result<StoreId, StoreResolutionError> {
        Ok(self.0)
    }
}

/// Resolves the store from the request's order, falling back to the
/// default store view.
pub struct OrderStoreResolver<'a> {
    request: &'a dyn RequestParams,
    orders: &'a dyn OrderRepository,
    stores: &'a dyn StoreDirectory,
}

impl<'a> OrderStoreResolver<'a> {
    /// Compose a resolver for one request.
    pub fn new(
        request: &'a dyn RequestParams,
        orders: &'a dyn OrderRepository,
        stores: &'a dyn StoreDirectory,
    ) -> Self {
        Self {
            request,
            orders,
            stores,
        }
    }
}

impl StoreResolver for OrderStoreResolver<'_> {
    fn resolve_store_id(&self) -> Result<StoreId, StoreResolutionError> {
        let default_store = self
            .stores
            .default_store_id()
            .ok_or(StoreResolutionError::DefaultStoreNotFound)?;

        let raw = self.request.param(ORDER_ID_PARAM).unwrap_or_default();
        let raw = raw.trim();
        if raw.is_empty() || raw.parse::<u64>() == Ok(0) {
            return Err(StoreResolutionError::MissingOrderId);
        }

        let order_id = match OrderId::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(store_id = %default_store, "{e}; using default store");
                return Ok(default_store);
            }
        };

        match self.orders.get(order_id) {
            Ok(order) if order.has_identity() => {
                tracing::debug!(order_id = %order_id, store_id = %order.store_id, "resolved store from order");
                Ok(order.store_id)
            }
            Ok(_) => {
                tracing::debug!(order_id = %order_id, "order has no identity, using default store");
                Ok(default_store)
            }
            Err(OrderLookupError::NotFound(_)) => {
                tracing::debug!(order_id = %order_id, "order not found, using default store");
                Ok(default_store)
            }
            Err(source) => Err(StoreResolutionError::OrderLookup { order_id, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Orders(HashMap<u64, Order>);

    impl OrderRepository for Orders {
        fn get(&self, id: OrderId) -> Result<Order, OrderLookupError> {
            self.0
                .get(&id.get())
                .cloned()
                .ok_or(OrderLookupError::NotFound(id))
        }
    }

    struct BrokenOrders;

    impl OrderRepository for BrokenOrders {
        fn get(&self, _id: OrderId) -> Result<Order, OrderLookupError> {
            Err(OrderLookupError::Backend {
                reason: "connection reset".to_string(),
            })
        }
    }

    struct Stores(Option<StoreId>);

    impl StoreDirectory for Stores {
        fn default_store_id(&self) -> Option<StoreId> {
            self.0
        }
    }

    fn request(order_id: Option<&str>) -> HashMap<String, String> {
        order_id
            .map(|id| (ORDER_ID_PARAM.to_string(), id.to_string()))
            .into_iter()
            .collect()
    }

    fn orders() -> Orders {
        Orders(HashMap::from([
            (
                42,
                Order {
                    entity_id: Some(42),
                    store_id: StoreId::new(3),
                },
            ),
            (
                43,
                Order {
                    entity_id: None,
                    store_id: StoreId::new(4),
                },
            ),
            (
                44,
                Order {
                    entity_id: Some(0),
                    store_id: StoreId::new(5),
                },
            ),
        ]))
    }

    fn resolve(order_id: Option<&str>) -> Result<StoreId, StoreResolutionError> {
        let req = request(order_id);
        let orders = orders();
        let stores = Stores(Some(StoreId::new(1)));
        OrderStoreResolver::new(&req, &orders, &stores).resolve_store_id()
    }

    #[test]
    fn order_store_wins() {
        assert_eq!(resolve(Some("42")).unwrap(), StoreId::new(3));
    }

    #[test]
    fn absent_blank_or_zero_order_id_is_fatal() {
        for param in [None, Some(""), Some("  "), Some("0"), Some(" 00 ")] {
            let err = resolve(param).unwrap_err();
            assert!(
                matches!(err, StoreResolutionError::MissingOrderId),
                "order_id = {param:?}"
            );
        }
        assert_eq!(
            StoreResolutionError::MissingOrderId.to_string(),
            "request parameter order_id is missing"
        );
    }

    #[test]
    fn malformed_order_id_uses_default() {
        assert_eq!(resolve(Some("abc")).unwrap(), StoreId::new(1));
        assert_eq!(resolve(Some("-4")).unwrap(), StoreId::new(1));
    }

    #[test]
    fn unknown_order_uses_default() {
        assert_eq!(resolve(Some("7")).unwrap(), StoreId::new(1));
    }

    #[test]
    fn order_without_identity_uses_default() {
        assert_eq!(resolve(Some("43")).unwrap(), StoreId::new(1));
        assert_eq!(resolve(Some("44")).unwrap(), StoreId::new(1));
    }

    #[test]
    fn missing_default_store_is_fatal() {
        let req = request(Some("42"));
        let orders = orders();
        let stores = Stores(None);
        let err = OrderStoreResolver::new(&req, &orders, &stores)
            .resolve_store_id()
            .unwrap_err();
        assert!(matches!(err, StoreResolutionError::DefaultStoreNotFound));
    }

    #[test]
    fn backend_failure_propagates() {
        let req = request(Some("42"));
        let stores = Stores(Some(StoreId::new(1)));
        let err = OrderStoreResolver::new(&req, &BrokenOrders, &stores)
            .resolve_store_id()
            .unwrap_err();
        match err {
            StoreResolutionError::OrderLookup { order_id, source } => {
                assert_eq!(order_id.get(), 42);
                assert!(matches!(source, OrderLookupError::Backend { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fixed_resolver_returns_its_store() {
        assert_eq!(
            FixedStoreResolver(StoreId::new(8)).resolve_store_id().unwrap(),
            StoreId::new(8)
        );
    }

    #[test]
    fn error_display() {
        let err = StoreResolutionError::OrderLookup {
            order_id: OrderId::new(9).unwrap(),
            source: OrderLookupError::Backend {
                reason: "timeout".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "order lookup failed for order 9: order backend unavailable: timeout"
        );
    }
}
