//! Demo catalog used to stock an empty ledger in dev and tests.

use chrono::{DateTime, Utc};

use freshcart_core::{Money, ProductId};
use freshcart_inventory::{NewProduct, Product, StoreError};

use crate::ledger::ProductCatalog;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price_cents: u64,
    category: &'static str,
    unit: &'static str,
    image: &'static str,
    stock: u32,
    featured: bool,
}

const DEMO_CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Fresh Apples",
        description: "Crisp and sweet apples, perfect for snacking",
        price_cents: 499,
        category: "Fruits",
        unit: "per lb",
        image: "/images/products/apples.jpg",
        stock: 100,
        featured: true,
    },
    SeedProduct {
        name: "Organic Bananas",
        description: "Ripe organic bananas, great source of potassium",
        price_cents: 299,
        category: "Fruits",
        unit: "per bunch",
        image: "/images/products/bananas.jpg",
        stock: 150,
        featured: true,
    },
    SeedProduct {
        name: "Strawberries",
        description: "Fresh, juicy strawberries",
        price_cents: 599,
        category: "Fruits",
        unit: "per pint",
        image: "/images/products/strawberries.jpg",
        stock: 80,
        featured: false,
    },
    SeedProduct {
        name: "Oranges",
        description: "Sweet and tangy oranges, packed with vitamin C",
        price_cents: 699,
        category: "Fruits",
        unit: "per 5 lb bag",
        image: "/images/products/oranges.jpg",
        stock: 60,
        featured: false,
    },
    SeedProduct {
        name: "Fresh Tomatoes",
        description: "Vine-ripened tomatoes, perfect for salads",
        price_cents: 399,
        category: "Vegetables",
        unit: "per lb",
        image: "/images/products/tomatoes.jpg",
        stock: 120,
        featured: true,
    },
    SeedProduct {
        name: "Organic Spinach",
        description: "Fresh organic spinach leaves",
        price_cents: 449,
        category: "Vegetables",
        unit: "per bunch",
        image: "/images/products/spinach.jpg",
        stock: 90,
        featured: false,
    },
    SeedProduct {
        name: "Carrots",
        description: "Crunchy and sweet carrots",
        price_cents: 299,
        category: "Vegetables",
        unit: "per 2 lb bag",
        image: "/images/products/carrots.jpg",
        stock: 100,
        featured: false,
    },
    SeedProduct {
        name: "Broccoli",
        description: "Fresh green broccoli crowns",
        price_cents: 349,
        category: "Vegetables",
        unit: "per head",
        image: "/images/products/broccoli.jpg",
        stock: 70,
        featured: false,
    },
    SeedProduct {
        name: "Whole Milk",
        description: "Fresh whole milk, farm to table",
        price_cents: 499,
        category: "Dairy",
        unit: "per gallon",
        image: "/images/products/milk.jpg",
        stock: 50,
        featured: true,
    },
    SeedProduct {
        name: "Organic Eggs",
        description: "Free-range organic eggs",
        price_cents: 699,
        category: "Dairy",
        unit: "per dozen",
        image: "/images/products/eggs.jpg",
        stock: 80,
        featured: false,
    },
    SeedProduct {
        name: "Cheddar Cheese",
        description: "Sharp cheddar cheese",
        price_cents: 799,
        category: "Dairy",
        unit: "per lb",
        image: "/images/products/cheese.jpg",
        stock: 45,
        featured: false,
    },
    SeedProduct {
        name: "Greek Yogurt",
        description: "Creamy Greek yogurt",
        price_cents: 549,
        category: "Dairy",
        unit: "per 32 oz",
        image: "/images/products/yogurt.jpg",
        stock: 60,
        featured: false,
    },
    SeedProduct {
        name: "Chicken Breast",
        description: "Boneless, skinless chicken breast",
        price_cents: 899,
        category: "Meat",
        unit: "per lb",
        image: "/images/products/chicken.jpg",
        stock: 40,
        featured: false,
    },
    SeedProduct {
        name: "Ground Beef",
        description: "85% lean ground beef",
        price_cents: 799,
        category: "Meat",
        unit: "per lb",
        image: "/images/products/beef.jpg",
        stock: 35,
        featured: false,
    },
    SeedProduct {
        name: "Wild Salmon",
        description: "Fresh wild-caught salmon fillet",
        price_cents: 1499,
        category: "Meat",
        unit: "per lb",
        image: "/images/products/salmon.jpg",
        stock: 25,
        featured: true,
    },
    SeedProduct {
        name: "Whole Wheat Bread",
        description: "Freshly baked whole wheat bread",
        price_cents: 399,
        category: "Bakery",
        unit: "per loaf",
        image: "/images/products/bread.jpg",
        stock: 50,
        featured: false,
    },
    SeedProduct {
        name: "Croissants",
        description: "Buttery, flaky croissants",
        price_cents: 599,
        category: "Bakery",
        unit: "per 6 pack",
        image: "/images/products/croissants.jpg",
        stock: 30,
        featured: false,
    },
    SeedProduct {
        name: "Pasta",
        description: "Premium Italian pasta",
        price_cents: 249,
        category: "Pantry",
        unit: "per 16 oz box",
        image: "/images/products/pasta.jpg",
        stock: 200,
        featured: false,
    },
    SeedProduct {
        name: "Rice",
        description: "Long grain white rice",
        price_cents: 899,
        category: "Pantry",
        unit: "per 5 lb bag",
        image: "/images/products/rice.jpg",
        stock: 100,
        featured: false,
    },
    SeedProduct {
        name: "Olive Oil",
        description: "Extra virgin olive oil",
        price_cents: 1299,
        category: "Pantry",
        unit: "per bottle",
        image: "/images/products/olive-oil.jpg",
        stock: 60,
        featured: false,
    },
];

/// Build the demo catalog with fresh ids, all stamped `now`.
pub fn demo_catalog(now: DateTime<Utc>) -> Result<Vec<Product>, StoreError> {
    DEMO_CATALOG
        .iter()
        .map(|seed| {
            Product::create(
                ProductId::new(),
                NewProduct {
                    name: seed.name.to_string(),
                    description: seed.description.to_string(),
                    category: seed.category.to_string(),
                    unit: seed.unit.to_string(),
                    image: Some(seed.image.to_string()),
                    price: Money::from_cents(seed.price_cents),
                    stock: seed.stock,
                    featured: seed.featured,
                },
                now,
            )
            .map_err(|e| {
                StoreError::serialization(format!("invalid seed product {}: {e}", seed.name))
            })
        })
        .collect()
}

/// Insert the demo catalog unless the target already holds products.
///
/// Returns the number of products inserted (zero when skipped).
pub async fn seed_demo_catalog<C>(catalog: &C) -> Result<usize, StoreError>
where
    C: ProductCatalog + ?Sized,
{
    let existing = catalog.product_count().await?;
    if existing > 0 {
        tracing::info!(existing, "catalog already stocked; skipping demo seed");
        return Ok(0);
    }

    let products = demo_catalog(Utc::now())?;
    for product in &products {
        catalog.insert_product(product).await?;
    }

    tracing::info!(count = products.len(), "seeded demo catalog");
    Ok(products.len())
}
