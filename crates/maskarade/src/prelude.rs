pub use crate::ModelsManager;
pub use maskarade_domain::config::MaskaradeConfig;
pub use maskarade_model::prelude::*;
