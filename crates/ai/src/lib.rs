//! `shopkeeper-ai`
//!
//! **Responsibility:** thin wrappers around a hosted language model.
//!
//! Each flow is a fixed prompt template with schema-typed input and output.
//! One round trip per call; no retries, no orchestration across calls, and no
//! mutation of domain state.

pub mod flow;
pub mod forecast;
pub mod model;
pub mod qa;

pub use flow::{run_flow, Flow};
pub use forecast::{ForecastSales, MonthlyForecast, MonthlySales, SalesForecast, SalesHistory};
pub use model::{AiError, HostedModelClient, ModelClient};
pub use qa::{AnswerBusinessQuestion, BusinessAnswer, BusinessQuestion, BusinessSnapshot};
