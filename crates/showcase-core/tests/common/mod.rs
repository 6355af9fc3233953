pub mod scripted_catalog;
