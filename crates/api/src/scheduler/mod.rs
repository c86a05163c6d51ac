pub mod run_scheduler;
