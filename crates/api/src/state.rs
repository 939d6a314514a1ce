use auth::TokenService;
use generate::Generator;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub generator: Generator,
    pub store: Store,
    pub tokens: TokenService,
}
