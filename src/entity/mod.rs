pub mod audit_logs;
pub mod brands;
pub mod categories;
pub mod category_attributes;
pub mod comments;
pub mod deals;
pub mod features;
pub mod likes;
pub mod product_attribute_values;
pub mod product_features;
pub mod product_images;
pub mod products;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use brands::Entity as Brands;
pub use categories::Entity as Categories;
pub use category_attributes::Entity as CategoryAttributes;
pub use comments::Entity as Comments;
pub use deals::Entity as Deals;
pub use features::Entity as Features;
pub use likes::Entity as Likes;
pub use product_attribute_values::Entity as ProductAttributeValues;
pub use product_features::Entity as ProductFeatures;
pub use product_images::Entity as ProductImages;
pub use products::Entity as Products;
pub use users::Entity as Users;
