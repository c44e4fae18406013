pub(crate) mod test_utils;

mod badge_tests;
mod bank_account_tests;
mod booking_tests;
mod verification_tests;
