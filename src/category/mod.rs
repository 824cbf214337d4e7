//! Categories and payment methods that projections and records reference.

mod db;
mod domain;
mod list;

pub use db::{
    create_category, create_category_table, create_payment_method, create_payment_method_table,
    get_all_categories, get_all_payment_methods,
};
pub use domain::{Category, Label, PaymentMethod, Reference};
pub use list::{
    CategoryListState, PaymentMethodListState, list_categories_endpoint,
    list_payment_methods_endpoint,
};
