mod common;
mod fatal_test;
mod git_env_test;
mod review_test;
