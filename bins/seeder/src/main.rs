//! Database seeder for treasury development and testing.
//!
//! Seeds a handful of test churches for local development. Funds are
//! seeded by the initial migration, not here.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use tesoreria_db::entities::churches;

/// Test church IDs (consistent for all seeds)
const TEST_CHURCHES: &[(&str, &str, &str, &str)] = &[
    (
        "00000000-0000-0000-0000-000000000101",
        "Iglesia Central",
        "Asunción",
        "Juan Benítez",
    ),
    (
        "00000000-0000-0000-0000-000000000102",
        "Iglesia de Luque",
        "Luque",
        "Pedro Giménez",
    ),
    (
        "00000000-0000-0000-0000-000000000103",
        "Iglesia de Encarnación",
        "Encarnación",
        "Carlos Ayala",
    ),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tesoreria_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test churches...");
    for (id, name, city, pastor) in TEST_CHURCHES {
        seed_church(&db, id, name, city, pastor).await;
    }

    println!("Seeding complete!");
}

/// Seeds one test church, skipping it when the row already exists.
async fn seed_church(db: &DatabaseConnection, id: &str, name: &str, city: &str, pastor: &str) {
    let church_id = Uuid::parse_str(id).expect("seed church id must be a valid UUID");

    // Check if the church already exists
    if churches::Entity::find_by_id(church_id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  {name} already exists, skipping...");
        return;
    }

    let church = churches::ActiveModel {
        id: Set(church_id),
        name: Set(name.to_string()),
        city: Set(Some(city.to_string())),
        pastor_name: Set(Some(pastor.to_string())),
        active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = church.insert(db).await {
        eprintln!("Failed to insert {name}: {e}");
    } else {
        println!("  Created church: {name}");
    }
}
