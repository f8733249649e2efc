pub mod budget;
pub mod category;
pub mod dashboard;
pub mod reminder;
pub mod transaction;
pub mod wallet;
