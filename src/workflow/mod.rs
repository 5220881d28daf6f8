pub mod blueprint_flow;
pub mod generate_flow;
pub mod plan_ctx;

pub use blueprint_flow::{BlueprintFlow, SaveOutcome};
pub use generate_flow::{GenerateFlow, GenerateOutcome};
pub use plan_ctx::PlanCtx;
