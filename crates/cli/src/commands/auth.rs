//! Account commands.

use vitrine_client::store::AuthState;

use crate::app::App;

pub async fn login(app: &mut App, email: &str, password: &str) {
    if app.auth.login(&app.gateway, email, password).await {
        match app.auth.current_user() {
            Some(user) => println!("Logged in as {}.", user.email),
            None => println!("Logged in."),
        }
    } else {
        println!("Login failed: check your email and password.");
    }
}

pub async fn register(app: &mut App, email: &str, password: &str) {
    match app.auth.register(&app.gateway, email, password).await {
        Some(user) => {
            println!("Account created for {}.", user.email);
            println!("Log in with: vitrine auth login {} --password <password>", user.email);
        }
        None => println!("Registration failed: the email may already be in use."),
    }
}

pub fn logout(app: &mut App) {
    app.auth.logout();
    println!("Logged out.");
}

pub async fn whoami(app: &mut App) {
    app.auth.load_user(&app.gateway).await;
    match app.auth.state() {
        AuthState::Authenticated(user) => println!("Logged in as {} (id {}).", user.email, user.id),
        AuthState::Anonymous => println!("Not logged in."),
        // load_user always settles the state; kept for completeness.
        AuthState::Unknown => println!("Identity not determined."),
    }
}
