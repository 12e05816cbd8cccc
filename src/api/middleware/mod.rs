//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Operator identity — rejects requests without `X-Operator-Id`
//! 2. Audit logger — logs after identity is known

pub mod audit;
pub mod operator;
