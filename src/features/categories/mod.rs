//! Product category hierarchy.
//!
//! Categories form a single-parent forest stored as a flat table. This
//! feature assembles the forest for navigation, annotates flat listings with
//! depth and path, and mutates the hierarchy without introducing cycles or
//! orphaned branches.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories` | No | Flat list (`?tree=true` for the forest) |
//! | GET | `/api/categories/{slug}` | No | Active category with parent and children |
//! | GET | `/api/admin/categories/{id}` | Admin key | Any category by id |
//! | POST | `/api/admin/categories` | Admin key | Create category |
//! | PATCH | `/api/admin/categories/{id}` | Admin key | Partial update / reparent |
//! | DELETE | `/api/admin/categories/{id}` | Admin key | Delete, reparenting children |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgCategoryRepository;
pub use services::CategoryService;
