#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rewards_coordinator::{CoordinatorConfig, MutationCoordinator};
use rewards_core::types::{Amount, DbId};
use rewards_db::models::lottery::CreateLottery;
use rewards_db::models::shop::CreateItem;
use rewards_db::models::task::CreateTask;
use rewards_db::repositories::{AccountRepo, ItemRepo, LotteryRepo, TaskRepo};
use rewards_economy::{Economy, EconomyConfig};
use rewards_events::EventBus;
use sqlx::PgPool;

/// One service instance: its own instance id and bus, sharing the pool.
pub fn instance(pool: &PgPool, instance_id: &str) -> (Economy, Arc<EventBus>) {
    let config = CoordinatorConfig {
        instance_id: instance_id.to_string(),
        lock_ttl: Duration::from_secs(10),
    };
    let bus = Arc::new(EventBus::default());
    let economy = Economy::new(
        MutationCoordinator::new(pool.clone(), &config),
        bus.clone(),
        EconomyConfig::default(),
    );
    (economy, bus)
}

pub fn economy(pool: &PgPool) -> Economy {
    instance(pool, "instance-a").0
}

pub async fn account(pool: &PgPool, id: DbId, referrer_id: Option<DbId>, balance: Amount) {
    AccountRepo::ensure(pool, id, referrer_id).await.unwrap();
    if !balance.is_zero() {
        AccountRepo::credit(pool, id, balance).await.unwrap();
    }
}

pub async fn balance(pool: &PgPool, id: DbId) -> Amount {
    AccountRepo::find_by_id(pool, id).await.unwrap().unwrap().balance
}

pub async fn item(pool: &PgPool, price: Amount) -> DbId {
    let input = CreateItem {
        name: "Golden pet".to_string(),
        price,
    };
    ItemRepo::create(pool, &input).await.unwrap().id
}

pub async fn task(pool: &PgPool, reward: Amount) -> DbId {
    let input = CreateTask {
        title: "Join the channel".to_string(),
        reward,
    };
    TaskRepo::create(pool, &input).await.unwrap().id
}

pub async fn lottery(pool: &PgPool, ticket_price: Amount) -> DbId {
    let input = CreateLottery {
        title: "Weekly draw".to_string(),
        ticket_price,
    };
    LotteryRepo::create(pool, &input).await.unwrap().id
}
