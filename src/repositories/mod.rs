pub mod places_repo;
