use crate::{
    config::AppConfig,
    controllers::{HomeController, HomeTimings},
    db::{DbPool, create_orm_conn, create_pool, run_migrations},
    repository::ProductRepository,
    settings::SettingsService,
    store::ProductStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub products: ProductRepository,
    pub settings: SettingsService,
    pub home_timings: HomeTimings,
}

impl AppState {
    /// Open the database, apply the schema and load preferences.
    pub async fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database_path).await?;
        run_migrations(&pool).await?;
        let orm = create_orm_conn(pool.clone());
        let products = ProductRepository::new(ProductStore::new(pool.clone(), orm));
        let settings = SettingsService::load(&config.prefs_path).await?;

        Ok(Self {
            pool,
            products,
            settings,
            home_timings: config.home_timings(),
        })
    }

    /// A home screen controller using the configured debounce and loading window.
    pub fn home_controller(&self) -> HomeController<AppState> {
        HomeController::spawn(self.clone(), self.home_timings)
    }

    pub async fn close(&self) {
        self.products.store().close().await;
    }
}
