//! Diesel adapters against an embedded PostgreSQL cluster.
//!
//! Every test provisions its own migrated database, seeds the reference rows
//! with plain SQL and registers two users through the user repository. The
//! adapters are async while rstest drives synchronous tests, so the context
//! owns a Tokio runtime and each test blocks on it.

use chrono::{DateTime, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::{Connection, PgConnection};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use recipe_backend::domain::ports::{
    FollowRepository, FollowRepositoryError, NewUserRecord, RecipeListRepository,
    RecipeListRepositoryError, RecipeRepository, RecipeRepositoryError, ReferenceRepository,
    UserRepository, UserRepositoryError,
};
use recipe_backend::domain::{
    Amount, CookingTime, IngredientId, IngredientLine, IngredientNameFilter, PasswordDigest,
    RecipeId, RecipeListKind, RecipeSelection, RecipeWrite, ShoppingListItem, TagId, User,
    UserProfileDraft,
};
use recipe_backend::outbound::persistence::{
    DbPool, DieselFollowRepository, DieselRecipeListRepository, DieselRecipeRepository,
    DieselReferenceRepository, DieselUserRepository, PoolConfig,
};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/cluster_skip.rs"]
mod cluster_skip;
#[path = "support/pg_embed.rs"]
mod pg_embed;

use cluster_skip::handle_cluster_setup_failure;
use pg_embed::{migrated_database, shared_cluster};

const OATS: i64 = 1;
const MILK: i64 = 2;
const SUGAR: i64 = 3;

const SEED_SQL: &str = "
    INSERT INTO tags (id, name, slug) VALUES
        (1, 'Breakfast', 'breakfast'),
        (2, 'Dinner', 'dinner');
    INSERT INTO ingredients (id, name, measurement_unit) VALUES
        (1, 'Oats', 'g'),
        (2, 'Milk', 'ml'),
        (3, 'Sugar', 'g'),
        (4, '100% juice', 'ml'),
        (5, '1000 island dressing', 'g');
";

// Stored digests are opaque to the repository.
const STORED_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo";

struct TestContext {
    runtime: Runtime,
    pool: DbPool,
    ada: User,
    bob: User,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn recipes(&self) -> DieselRecipeRepository {
        DieselRecipeRepository::new(self.pool.clone())
    }

    fn lists(&self) -> DieselRecipeListRepository {
        DieselRecipeListRepository::new(self.pool.clone())
    }

    fn follows(&self) -> DieselFollowRepository {
        DieselFollowRepository::new(self.pool.clone())
    }

    fn users(&self) -> DieselUserRepository {
        DieselUserRepository::new(self.pool.clone())
    }

    fn reference(&self) -> DieselReferenceRepository {
        DieselReferenceRepository::new(self.pool.clone())
    }
}

fn published_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn user_record(username: &str) -> NewUserRecord {
    NewUserRecord {
        profile: UserProfileDraft::try_from_parts(
            &format!("{username}@example.com"),
            username,
            "Test",
            "Cook",
            None,
        )
        .expect("valid profile"),
        avatar: None,
        password: PasswordDigest::from_stored(STORED_DIGEST),
        date_joined: published_at(),
    }
}

fn write(author: &User, name: &str, tags: &[i64], lines: &[(i64, i64)]) -> RecipeWrite {
    RecipeWrite {
        author: author.id,
        name: name.to_owned(),
        text: "Mix and serve.".to_owned(),
        cooking_time: CookingTime::new(15).expect("valid cooking time"),
        image: None,
        tags: tags
            .iter()
            .map(|id| TagId::new(*id).expect("valid tag id"))
            .collect(),
        ingredients: lines
            .iter()
            .map(|(id, amount)| {
                let ingredient = IngredientId::new(*id).expect("valid ingredient id");
                IngredientLine {
                    ingredient,
                    amount: Amount::new(ingredient, *amount).expect("valid amount"),
                }
            })
            .collect(),
        published_at: published_at(),
    }
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = migrated_database(cluster)?;

    let mut conn = PgConnection::establish(database.url()).map_err(|err| err.to_string())?;
    conn.batch_execute(SEED_SQL)
        .map_err(|err| format!("seed reference rows: {err}"))?;

    let config = PoolConfig::new(database.url()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let users = DieselUserRepository::new(pool.clone());
    let (ada, bob) = runtime
        .block_on(async {
            let ada = users.create(&user_record("ada")).await?;
            let bob = users.create(&user_record("bob")).await?;
            Ok::<_, UserRepositoryError>((ada, bob))
        })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        pool,
        ada,
        bob,
        _database: database,
    })
}

#[fixture]
fn diesel_world() -> Option<TestContext> {
    match setup_test_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn recipe_update_replaces_tags_and_ingredients(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: recipe_update_replaces_tags_and_ingredients skipped");
        return;
    };
    let recipes = ctx.recipes();

    let stored = ctx.runtime.block_on(async {
        let id = recipes
            .create(&write(&ctx.ada, "Porridge", &[1], &[(OATS, 50), (MILK, 200)]))
            .await
            .expect("create recipe");
        let created = recipes.find_by_id(id).await.expect("load").expect("row");
        assert_eq!(created.author.username.as_ref(), "ada");
        assert_eq!(
            created.tags.iter().map(|tag| tag.slug.as_str()).collect::<Vec<_>>(),
            ["breakfast"]
        );
        assert_eq!(
            created
                .ingredients
                .iter()
                .map(|line| (line.ingredient.name.as_str(), line.amount.get()))
                .collect::<Vec<_>>(),
            [("Oats", 50), ("Milk", 200)]
        );

        recipes
            .update(id, &write(&ctx.ada, "Sweet porridge", &[2], &[(SUGAR, 5)]))
            .await
            .expect("update recipe");
        recipes.find_by_id(id).await.expect("reload").expect("row")
    });

    assert_eq!(stored.name, "Sweet porridge");
    assert_eq!(
        stored.tags.iter().map(|tag| tag.slug.as_str()).collect::<Vec<_>>(),
        ["dinner"]
    );
    assert_eq!(
        stored
            .ingredients
            .iter()
            .map(|line| (line.ingredient.name.as_str(), line.amount.get()))
            .collect::<Vec<_>>(),
        [("Sugar", 5)]
    );
    assert_eq!(stored.published_at, published_at());
}

#[rstest]
fn unknown_ingredient_rolls_back_the_whole_recipe(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_ingredient_rolls_back_the_whole_recipe skipped");
        return;
    };
    let recipes = ctx.recipes();

    let (result, remaining) = ctx.runtime.block_on(async {
        let result = recipes
            .create(&write(&ctx.ada, "Ghost stew", &[1], &[(OATS, 10), (999, 1)]))
            .await;
        let remaining = recipes
            .list(&RecipeSelection::default())
            .await
            .expect("list recipes");
        (result, remaining)
    });

    assert!(
        matches!(result, Err(RecipeRepositoryError::MissingReference { .. })),
        "unexpected result: {result:?}"
    );
    assert!(remaining.is_empty(), "recipe row survived: {remaining:?}");
}

#[rstest]
fn updating_a_missing_recipe_reports_not_found(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: updating_a_missing_recipe_reports_not_found skipped");
        return;
    };
    let recipes = ctx.recipes();
    let missing = RecipeId::new(424_242).expect("valid recipe id");

    let result = ctx
        .runtime
        .block_on(recipes.update(missing, &write(&ctx.ada, "Nothing", &[], &[(OATS, 1)])));

    assert_eq!(result, Err(RecipeRepositoryError::not_found(424_242)));
}

#[rstest]
fn favoriting_twice_is_a_duplicate(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: favoriting_twice_is_a_duplicate skipped");
        return;
    };
    let recipes = ctx.recipes();
    let lists = ctx.lists();

    ctx.runtime.block_on(async {
        let recipe = recipes
            .create(&write(&ctx.bob, "Pancakes", &[1], &[(MILK, 300)]))
            .await
            .expect("create recipe");

        let entry = lists
            .add(RecipeListKind::Favorites, ctx.ada.id, recipe)
            .await
            .expect("first favorite");
        assert_eq!(entry.user.as_ref(), "ada");
        assert_eq!(entry.recipe, recipe);

        let again = lists.add(RecipeListKind::Favorites, ctx.ada.id, recipe).await;
        assert!(
            matches!(again, Err(RecipeListRepositoryError::Duplicate)),
            "unexpected result: {again:?}"
        );

        // The cart is a separate list.
        lists
            .add(RecipeListKind::ShoppingCart, ctx.ada.id, recipe)
            .await
            .expect("cart entry");

        let favorited = lists
            .recipes_among(RecipeListKind::Favorites, ctx.ada.id, &[recipe])
            .await
            .expect("favorites");
        assert!(favorited.contains(&recipe));
    });
}

#[rstest]
fn following_twice_is_a_duplicate(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: following_twice_is_a_duplicate skipped");
        return;
    };
    let follows = ctx.follows();

    ctx.runtime.block_on(async {
        let follow = follows
            .create(ctx.ada.id, ctx.bob.id)
            .await
            .expect("first follow");
        assert_eq!(follow.user.as_ref(), "ada");
        assert_eq!(follow.author.as_ref(), "bob");

        let again = follows.create(ctx.ada.id, ctx.bob.id).await;
        assert_eq!(again, Err(FollowRepositoryError::duplicate()));

        assert!(follows.exists(ctx.ada.id, ctx.bob.id).await.expect("exists"));
        assert!(!follows.exists(ctx.bob.id, ctx.ada.id).await.expect("exists"));
    });
}

#[rstest]
fn shopping_list_sums_amounts_across_the_cart(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: shopping_list_sums_amounts_across_the_cart skipped");
        return;
    };
    let recipes = ctx.recipes();
    let lists = ctx.lists();

    let (ada_list, bob_list) = ctx.runtime.block_on(async {
        let porridge = recipes
            .create(&write(&ctx.bob, "Porridge", &[1], &[(OATS, 50), (MILK, 200)]))
            .await
            .expect("create porridge");
        let flapjack = recipes
            .create(&write(&ctx.bob, "Flapjack", &[2], &[(OATS, 30), (SUGAR, 5)]))
            .await
            .expect("create flapjack");
        for recipe in [porridge, flapjack] {
            lists
                .add(RecipeListKind::ShoppingCart, ctx.ada.id, recipe)
                .await
                .expect("cart entry");
        }
        (
            lists.shopping_list(ctx.ada.id).await.expect("ada's list"),
            lists.shopping_list(ctx.bob.id).await.expect("bob's list"),
        )
    });

    let item = |name: &str, unit: &str, total_amount: i64| ShoppingListItem {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
        total_amount,
    };
    assert_eq!(
        ada_list,
        [item("Milk", "ml", 200), item("Oats", "g", 80), item("Sugar", "g", 5)]
    );
    assert!(bob_list.is_empty());
}

#[rstest]
fn reused_email_is_rejected(diesel_world: Option<TestContext>) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: reused_email_is_rejected skipped");
        return;
    };
    let users = ctx.users();
    let mut record = user_record("carol");
    record.profile.email = ctx.ada.email.clone();

    let result = ctx.runtime.block_on(users.create(&record));

    assert_eq!(result, Err(UserRepositoryError::duplicate_email()));
}

#[rstest]
#[case("MI", &["Milk"])]
#[case("100%", &["100% juice"])]
#[case("1", &["1000 island dressing", "100% juice"])]
fn ingredient_prefix_matches_literally(
    diesel_world: Option<TestContext>,
    #[case] prefix: &str,
    #[case] expected: &[&str],
) {
    let Some(ctx) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: ingredient_prefix_matches_literally skipped");
        return;
    };
    let reference = ctx.reference();

    let found = ctx
        .runtime
        .block_on(reference.list_ingredients(IngredientNameFilter::new(prefix)))
        .expect("list ingredients");

    let mut names: Vec<&str> = found.iter().map(|row| row.name.as_str()).collect();
    names.sort_unstable();
    let mut wanted = expected.to_vec();
    wanted.sort_unstable();
    assert_eq!(names, wanted);
}
