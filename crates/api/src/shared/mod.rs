pub mod delivery;
pub mod dispatch_queue;
#[cfg(test)]
pub mod test_utils;
pub mod usecase;
