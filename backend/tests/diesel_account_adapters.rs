//! Diesel account adapters against embedded PostgreSQL.
//!
//! Covers the transactional account write, the identity and profile lookups,
//! the unique-constraint classification and rollback when a later insert
//! fails.

use argon2::Params;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use portal::domain::ports::{
    AccountRepository, AccountRepositoryError, IdentityStore, NewAccount, ProfileStore,
};
use portal::domain::{AddressDraft, EmailAddress, Password, PersonName, Role, Username};
use portal::outbound::credentials::CredentialHasher;
use portal::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselIdentityStore, DieselProfileStore, PoolConfig,
};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{handle_cluster_setup_failure, migrated_database};

struct TestContext {
    runtime: Runtime,
    accounts: DieselAccountRepository,
    identities: DieselIdentityStore,
    profiles: DieselProfileStore,
    database_url: String,
    _database: TemporaryDatabase,
}

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

impl TestContext {
    fn sql(&self, statement: &str) {
        let mut conn = PgConnection::establish(&self.database_url).expect("sync connection");
        diesel::sql_query(statement)
            .execute(&mut conn)
            .expect("statement runs");
    }

    fn rows(&self, table: &str) -> i64 {
        let mut conn = PgConnection::establish(&self.database_url).expect("sync connection");
        diesel::sql_query(format!("SELECT count(*) AS count FROM {table}"))
            .get_result::<RowCount>(&mut conn)
            .expect("count")
            .count
    }
}

/// Argon2 at minimum cost; these suites exercise storage, not hash strength.
fn hasher() -> CredentialHasher {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
    CredentialHasher::with_params(params)
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = migrated_database(&runtime)?;
    let database_url = database.url().to_owned();
    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        accounts: DieselAccountRepository::new(pool.clone(), hasher()),
        identities: DieselIdentityStore::new(pool.clone(), hasher()),
        profiles: DieselProfileStore::new(pool),
        runtime,
        database_url,
        _database: database,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    setup_context().map_or_else(handle_cluster_setup_failure, Some)
}

fn account(role: Role, username: &str, email: &str, address: Option<AddressDraft>) -> NewAccount {
    NewAccount {
        role,
        username: Username::new(username).expect("username"),
        email: EmailAddress::new(email).expect("email"),
        password: Password::new("analytical-engine").expect("password"),
        name: PersonName::new("Ada", "Lovelace").expect("name"),
        address,
        image: None,
    }
}

fn full_address() -> Option<AddressDraft> {
    AddressDraft::from_parts(
        Some("12 St James's Square"),
        Some("London"),
        Some("England"),
        Some("SW1Y 4JH"),
    )
    .expect("valid address")
}

#[rstest]
fn registered_account_is_visible_through_every_adapter(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let registered = ctx
        .runtime
        .block_on(ctx.accounts.create_account(account(
            Role::Doctor,
            "ada",
            "ada@Example.com",
            full_address(),
        )))
        .expect("account created");
    let address = registered.address.as_ref().expect("address stored");
    assert_eq!(registered.profile.address_id(), Some(address.id()));

    let username = Username::new("ada").expect("username");
    let by_name = ctx
        .runtime
        .block_on(ctx.identities.find_by_username(&username))
        .expect("lookup")
        .expect("identity stored");
    assert_eq!(by_name.id(), registered.identity.id());
    assert_eq!(by_name.name().last(), "Lovelace");

    let email = EmailAddress::new("ada@example.com").expect("email");
    let by_email = ctx
        .runtime
        .block_on(ctx.identities.find_by_email(&email))
        .expect("lookup")
        .expect("email normalised on write");
    assert_eq!(by_email.id(), registered.identity.id());

    let good = Password::new("analytical-engine").expect("password");
    let bad = Password::new("difference-engine").expect("password");
    assert!(
        ctx.runtime
            .block_on(ctx.identities.verify_credential("ada", &good))
            .expect("verify")
            .is_some()
    );
    assert!(
        ctx.runtime
            .block_on(ctx.identities.verify_credential("ada", &bad))
            .expect("verify")
            .is_none()
    );

    let doctor = ctx
        .runtime
        .block_on(ctx.profiles.find_profile(Role::Doctor, registered.identity.id()))
        .expect("profile lookup")
        .expect("doctor profile");
    assert_eq!(doctor.id(), registered.profile.id());
    assert!(
        ctx.runtime
            .block_on(ctx.profiles.find_profile(Role::Patient, registered.identity.id()))
            .expect("profile lookup")
            .is_none()
    );
}

#[rstest]
#[case::username("ada", "grace@example.com", AccountRepositoryError::DuplicateUsername)]
#[case::email("grace", "ada@EXAMPLE.com", AccountRepositoryError::DuplicateEmail)]
fn unique_violations_are_classified(
    context: Option<TestContext>,
    #[case] username: &str,
    #[case] email: &str,
    #[case] expected: AccountRepositoryError,
) {
    let Some(ctx) = context else { return };

    ctx.runtime
        .block_on(ctx.accounts.create_account(account(
            Role::Patient,
            "ada",
            "ada@example.com",
            None,
        )))
        .expect("first account");
    let err = ctx
        .runtime
        .block_on(ctx.accounts.create_account(account(
            Role::Patient,
            username,
            email,
            full_address(),
        )))
        .expect_err("duplicate rejected");

    assert_eq!(err, expected);
    assert_eq!(ctx.rows("identities"), 1);
    assert_eq!(ctx.rows("addresses"), 0);
    assert_eq!(ctx.rows("profiles"), 1);
}

#[rstest]
fn concurrent_writes_for_one_username_leave_one_identity(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let (first, second) = ctx.runtime.block_on(async {
        tokio::join!(
            ctx.accounts
                .create_account(account(Role::Patient, "ada", "ada@example.com", None)),
            ctx.accounts
                .create_account(account(Role::Doctor, "ada", "lovelace@example.com", None)),
        )
    });

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AccountRepositoryError::DuplicateUsername)))
    );
    assert_eq!(ctx.rows("identities"), 1);
}

#[rstest]
fn failed_profile_insert_rolls_back_identity_and_address(context: Option<TestContext>) {
    let Some(ctx) = context else { return };
    ctx.sql("DROP TABLE profiles");

    let err = ctx
        .runtime
        .block_on(ctx.accounts.create_account(account(
            Role::Patient,
            "ada",
            "ada@example.com",
            full_address(),
        )))
        .expect_err("profile insert fails");

    assert!(
        matches!(err, AccountRepositoryError::Query { .. }),
        "unexpected error: {err:?}"
    );
    let username = Username::new("ada").expect("username");
    assert!(
        ctx.runtime
            .block_on(ctx.identities.find_by_username(&username))
            .expect("lookup")
            .is_none()
    );
    assert_eq!(ctx.rows("identities"), 0);
    assert_eq!(ctx.rows("addresses"), 0);
}
