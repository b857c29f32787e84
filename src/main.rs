use adw::prelude::*;
use adw::Application;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = Application::builder()
        .application_id("com.example.ParleyGtk")
        .build();
    app.connect_activate(|app| {
        parley::app::build_ui(app);
    });
    app.run();
}
