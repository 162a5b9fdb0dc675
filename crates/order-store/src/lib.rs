pub mod error;
pub mod memory;
pub mod payment;
pub mod postgres;
pub mod store;

pub use common::OrderId;
pub use error::{Result, StoreError};
pub use memory::{InMemoryOrderStore, InMemoryTransaction};
pub use payment::PaymentRepository;
pub use postgres::{PostgresOrderStore, PostgresTransaction};
pub use store::{OrderStore, OrderTransaction};
