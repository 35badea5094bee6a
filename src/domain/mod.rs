pub mod entities;
pub mod errors;
pub mod events;
pub mod state_machine;
pub mod value_objects;

pub use entities::{PaymentDetail, PaymentMain, TradeOrderLite};
pub use events::PaymentEvent;
pub use state_machine::{payment_state_machine, PaymentStateMachine};
pub use value_objects::{Money, PaymentMethod, PaymentStatus, TradeOrderStatus};
