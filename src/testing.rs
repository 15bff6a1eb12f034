// src/testing.rs
//
// In-memory SQLite fixtures shared by the unit and router tests.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::db::Store;

const SCHEMA: &[&str] = &[
    "CREATE TABLE Providers (Provider_ID INTEGER PRIMARY KEY, Name TEXT, Type TEXT, Contact TEXT, City TEXT)",
    "CREATE TABLE Receivers (Receiver_ID INTEGER PRIMARY KEY, Name TEXT, City TEXT)",
    "CREATE TABLE Food_Listings (Food_ID INTEGER PRIMARY KEY, Food_Name TEXT, Food_Type TEXT, Meal_Type TEXT, Quantity INTEGER, Location TEXT, Provider_ID INTEGER)",
    "CREATE TABLE Claims (Claim_ID INTEGER PRIMARY KEY, Status TEXT, Food_ID INTEGER, Receiver_ID INTEGER)",
];

pub async fn memory_pool() -> SqlitePool {
    // One connection that never recycles, or the in-memory data is lost.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(&pool).await.expect("schema");
    }
    pool
}

pub async fn provider(pool: &SqlitePool, id: i64, name: &str, kind: &str, contact: &str, city: &str) {
    sqlx::query("INSERT INTO Providers (Provider_ID, Name, Type, City, Contact) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(kind)
        .bind(city)
        .bind(contact)
        .execute(pool)
        .await
        .expect("insert provider");
}

pub async fn receiver(pool: &SqlitePool, id: i64, name: &str, city: &str) {
    sqlx::query("INSERT INTO Receivers (Receiver_ID, Name, City) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(city)
        .execute(pool)
        .await
        .expect("insert receiver");
}

#[allow(clippy::too_many_arguments)]
pub async fn listing(
    pool: &SqlitePool,
    id: i64,
    food: &str,
    food_type: &str,
    meal: &str,
    quantity: i64,
    location: &str,
    provider_id: i64,
) {
    sqlx::query(
        "INSERT INTO Food_Listings (Food_ID, Food_Name, Food_Type, Meal_Type, Quantity, Location, Provider_ID)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(food)
    .bind(food_type)
    .bind(meal)
    .bind(quantity)
    .bind(location)
    .bind(provider_id)
    .execute(pool)
    .await
    .expect("insert listing");
}

pub async fn claim(pool: &SqlitePool, id: i64, status: &str, food_id: i64, receiver_id: i64) {
    sqlx::query("INSERT INTO Claims (Claim_ID, Status, Food_ID, Receiver_ID) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(status)
        .bind(food_id)
        .bind(receiver_id)
        .execute(pool)
        .await
        .expect("insert claim");
}

pub async fn empty_store() -> Store {
    Store::Ready(memory_pool().await)
}

/// One provider, listing, claim and receiver, all in Metropolis.
pub async fn single_city_store() -> Store {
    let pool = memory_pool().await;
    provider(&pool, 1, "A", "Grocery", "a@x.com", "Metropolis").await;
    listing(&pool, 10, "Bread", "Bakery", "Lunch", 5, "Metropolis", 1).await;
    claim(&pool, 100, "Completed", 10, 1).await;
    receiver(&pool, 1, "R1", "Metropolis").await;
    Store::Ready(pool)
}

/// A few cities with mixed claim statuses. Smallville only appears as a
/// listing location and Coast City only as a receiver city.
pub async fn sample_store() -> Store {
    let pool = memory_pool().await;

    provider(&pool, 1, "Fresh Mart", "Grocery Store", "fm@x.com", "Metropolis").await;
    provider(&pool, 2, "Corner Bakery", "Restaurant", "cb@x.com", "Metropolis").await;
    provider(&pool, 3, "Green Farm", "Supermarket", "gf@x.com", "Gotham").await;
    provider(&pool, 4, "City Diner", "Restaurant", "cd@x.com", "Star City").await;

    receiver(&pool, 1, "Hope Shelter", "Metropolis").await;
    receiver(&pool, 2, "Food Bank", "Gotham").await;
    receiver(&pool, 3, "Kids Care", "Metropolis").await;
    receiver(&pool, 4, "Elder Home", "Coast City").await;

    listing(&pool, 10, "Bread", "Vegetarian", "Breakfast", 20, "Metropolis", 1).await;
    listing(&pool, 11, "Rice", "Vegan", "Lunch", 50, "Metropolis", 2).await;
    listing(&pool, 12, "Chicken", "Non-Vegetarian", "Dinner", 30, "Gotham", 3).await;
    listing(&pool, 13, "Salad", "Vegan", "Lunch", 15, "Gotham", 3).await;
    listing(&pool, 14, "Soup", "Vegetarian", "Dinner", 10, "Smallville", 4).await;

    claim(&pool, 100, "Completed", 10, 1).await;
    claim(&pool, 101, "Completed", 11, 1).await;
    claim(&pool, 102, "Pending", 12, 2).await;
    claim(&pool, 103, "Cancelled", 13, 2).await;
    claim(&pool, 104, "Completed", 12, 3).await;
    claim(&pool, 105, "Completed", 14, 4).await;
    claim(&pool, 106, "Pending", 11, 3).await;

    Store::Ready(pool)
}
