use std::collections::HashSet;

use storefront_api::{
    dto::{
        cart::AddCartLineRequest,
        compliments::{ComplimentAssignment, CreateComplimentRequest, SendComplimentsRequest},
        stores::{NewStoreItem, ReplaceStoreRequest},
    },
    error::AppError,
    services::{
        cart_service, compliment_service, email_service::EmailClient,
        payment_service::PaymentClient, store_service,
    },
    state::AppState,
};
use uuid::Uuid;

#[tokio::test]
async fn store_replace_round_trips_and_reissues_item_ids() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = create_user(&state, "Owner").await?;

    let payload = || ReplaceStoreRequest {
        name: "Corner Bakery".into(),
        description: Some("Fresh bread daily".into()),
        location: Some("5th and Main".into()),
        items: vec![
            NewStoreItem {
                title: "Sourdough".into(),
                description: Some("Whole loaf".into()),
                price: 800,
                quantity: 12,
            },
            NewStoreItem {
                title: "Croissant".into(),
                description: None,
                price: 400,
                quantity: 30,
            },
        ],
    };

    let first = store_service::replace_store(&state.pool, owner, payload())
        .await?
        .data
        .unwrap();
    assert_eq!(first.store.name, "Corner Bakery");
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].title, "Sourdough");
    assert_eq!(first.items[0].price, 800);

    // A second wholesale replace reissues every item id.
    let second = store_service::replace_store(&state.pool, owner, payload())
        .await?
        .data
        .unwrap();
    let old_ids: HashSet<Uuid> = first.items.iter().map(|i| i.id).collect();
    assert!(second.items.iter().all(|i| !old_ids.contains(&i.id)));

    // Fetch returns exactly what was submitted.
    let fetched = store_service::get_store(&state.pool, owner).await?.data.unwrap();
    assert_eq!(fetched.items.len(), 2);
    assert_eq!(fetched.store.location.as_deref(), Some("5th and Main"));

    Ok(())
}

#[tokio::test]
async fn item_delete_removes_exactly_one_row() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = create_user(&state, "Owner").await?;
    let shop = store_service::replace_store(
        &state.pool,
        owner,
        ReplaceStoreRequest {
            name: "Two Items".into(),
            description: None,
            location: None,
            items: vec![
                NewStoreItem {
                    title: "Keep Me".into(),
                    description: None,
                    price: 100,
                    quantity: 1,
                },
                NewStoreItem {
                    title: "Drop Me".into(),
                    description: None,
                    price: 200,
                    quantity: 2,
                },
            ],
        },
    )
    .await?
    .data
    .unwrap();

    let keep = shop.items.iter().find(|i| i.title == "Keep Me").unwrap().clone();
    let dropped = shop.items.iter().find(|i| i.title == "Drop Me").unwrap();

    store_service::remove_item(&state.pool, owner, dropped.id).await?;

    let after = store_service::get_store(&state.pool, owner).await?.data.unwrap();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].id, keep.id);
    assert_eq!(after.items[0].title, "Keep Me");
    assert_eq!(after.items[0].price, 100);

    // Deleting again is a 404.
    let err = store_service::remove_item(&state.pool, owner, dropped.id).await;
    assert!(matches!(err, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn item_update_preserves_id_and_siblings() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = create_user(&state, "Owner").await?;
    store_service::replace_store(
        &state.pool,
        owner,
        ReplaceStoreRequest {
            name: "Editable".into(),
            description: None,
            location: None,
            items: vec![NewStoreItem {
                title: "Before".into(),
                description: None,
                price: 300,
                quantity: 3,
            }],
        },
    )
    .await?;

    let added = store_service::add_item(
        &state.pool,
        owner,
        NewStoreItem {
            title: "Added Later".into(),
            description: None,
            price: 150,
            quantity: 5,
        },
    )
    .await?
    .data
    .unwrap();

    let updated = store_service::update_item(
        &state.pool,
        owner,
        added.id,
        NewStoreItem {
            title: "After".into(),
            description: Some("edited".into()),
            price: 175,
            quantity: 4,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.id, added.id);
    assert_eq!(updated.title, "After");
    assert_eq!(updated.price, 175);

    let shop = store_service::get_store(&state.pool, owner).await?.data.unwrap();
    assert!(shop.items.iter().any(|i| i.title == "Before"));

    Ok(())
}

#[tokio::test]
async fn compliment_batch_and_atomic_send() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = create_user(&state, "Owner").await?;

    let batch = compliment_service::create_batch(
        &state.pool,
        owner,
        CreateComplimentRequest {
            title: "Free Drink".into(),
            amount: 300,
            start_date: Some("2026-09-01".into()),
            start_time: Some("09:00".into()),
            end_time: Some("17:00".into()),
            quantity: 3,
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(batch.compliments.len(), 3);
    let group_ids: HashSet<&str> = batch.compliments.iter().map(|c| c.group_id.as_str()).collect();
    assert_eq!(group_ids.len(), 1, "one group token shared by the batch");
    let ids: HashSet<Uuid> = batch.compliments.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 3, "every record gets its own id");
    assert!(batch.compliments.iter().all(|c| !c.sent && !c.claimed));

    // Send one; the matching record flips, siblings stay untouched.
    let target = batch.compliments[0].id;
    compliment_service::send_compliments(
        &state.pool,
        owner,
        SendComplimentsRequest {
            assignments: vec![ComplimentAssignment {
                compliment_id: target,
                recipient: "follower@example.com".into(),
            }],
        },
    )
    .await?;

    let listed = compliment_service::list_compliments(&state.pool, owner)
        .await?
        .data
        .unwrap();
    let sent: Vec<_> = listed.compliments.iter().filter(|c| c.sent).collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, target);
    assert_eq!(sent[0].recipient.as_deref(), Some("follower@example.com"));

    // One bogus pair rolls back the whole send.
    let err = compliment_service::send_compliments(
        &state.pool,
        owner,
        SendComplimentsRequest {
            assignments: vec![
                ComplimentAssignment {
                    compliment_id: batch.compliments[1].id,
                    recipient: "a@example.com".into(),
                },
                ComplimentAssignment {
                    compliment_id: Uuid::new_v4(),
                    recipient: "b@example.com".into(),
                },
            ],
        },
    )
    .await;
    assert!(matches!(err, Err(AppError::NotFound)));

    let listed = compliment_service::list_compliments(&state.pool, owner)
        .await?
        .data
        .unwrap();
    assert_eq!(
        listed.compliments.iter().filter(|c| c.sent).count(),
        1,
        "failed batch must not mark anything sent"
    );

    Ok(())
}

#[tokio::test]
async fn cart_rejects_invalid_lines_at_write_time() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = create_user(&state, "Owner").await?;
    let patron = create_user(&state, "Patron").await?;
    let shop = store_service::replace_store(
        &state.pool,
        owner,
        ReplaceStoreRequest {
            name: "Cart Shop".into(),
            description: None,
            location: None,
            items: vec![NewStoreItem {
                title: "Thing".into(),
                description: None,
                price: 250,
                quantity: 9,
            }],
        },
    )
    .await?
    .data
    .unwrap();

    let err = cart_service::add_line(
        &state.pool,
        patron,
        AddCartLineRequest {
            store_id: shop.store.id,
            item_id: shop.items[0].id,
            quantity: 0,
            notes: None,
        },
    )
    .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    let err = cart_service::add_line(
        &state.pool,
        patron,
        AddCartLineRequest {
            store_id: shop.store.id,
            item_id: Uuid::new_v4(),
            quantity: 1,
            notes: None,
        },
    )
    .await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    // A valid line lands with the server-side price snapshot.
    let line = cart_service::add_line(
        &state.pool,
        patron,
        AddCartLineRequest {
            store_id: shop.store.id,
            item_id: shop.items[0].id,
            quantity: 2,
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(line.price, 250);
    assert_eq!(line.item_name, "Thing");
    assert_eq!(line.store_name, "Cart Shop");

    cart_service::remove_line(&state.pool, patron, line.id).await?;
    let cart = cart_service::list_cart(&state.pool, patron).await?.data.unwrap();
    assert!(cart.cart.is_empty());

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = storefront_api::db::create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(Some(AppState {
        pool,
        payments: PaymentClient::new(None),
        mailer: EmailClient::new(None),
    }))
}

async fn create_user(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let email = format!("{}@example.com", Uuid::new_v4());
    let row: (Uuid,) =
        sqlx::query_as("INSERT INTO users (id, name, email) VALUES ($1, $2, $3) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .fetch_one(&state.pool)
            .await?;
    Ok(row.0)
}
