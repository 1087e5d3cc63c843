/// MealBridge - food donation platform
///
/// Server-rendered web application connecting food donors with NGOs:
/// donors submit donation records, NGOs browse a filtered, paginated list
/// and accept them. Session-cookie authentication with two roles guards
/// the role-specific pages.

pub mod auth;
pub mod config;
pub mod db;
pub mod handlers;
pub mod pages;
pub mod server;
