mod scheduler;

pub mod dtos {
    pub use crate::scheduler::dtos::*;
}

pub use crate::scheduler::api::*;
