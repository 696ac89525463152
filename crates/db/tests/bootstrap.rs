use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    rewards_db::health_check(&pool).await.unwrap();

    let tables = [
        "locks",
        "accounts",
        "ledger",
        "items",
        "purchased_items",
        "tasks",
        "task_completions",
        "lotteries",
        "lottery_tickets",
        "withdrawal_requests",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}
