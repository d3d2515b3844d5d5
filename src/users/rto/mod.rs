pub mod dashboard_rto;
pub mod paginated_rto;
pub mod user_rto;
