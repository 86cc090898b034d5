pub mod job_check;
