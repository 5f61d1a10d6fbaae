use actix_files::Files;
use actix_web::{web, Scope};

use crate::api::{admin, crud, emails, forms, health};
use crate::middleware::AuthMiddleware;
use crate::models::email::{
    BookingEmail, DonationEmail, PurchaseEmail, RefundEmail, ReturnEmail, SubscriptionEmail,
};
use crate::models::{
    Donation, Editable, Event, EventParticipant, Faq, Membership, Product, ProductReturn,
    Purchase, Refund, Subscription, Ticket,
};
use crate::state::AppState;
use crate::utils::AppError;

/// Resource whose body is JSON.
fn json_resource<T: Editable>(prefix: &str) -> Scope {
    web::scope(prefix)
        .route("", web::get().to(crud::list::<T>))
        .route("", web::post().to(crud::create::<T>))
        .route("/", web::get().to(crud::list::<T>))
        .route("/", web::post().to(crud::create::<T>))
        .route("/{id}", web::get().to(crud::get::<T>))
        .route("/{id}", web::put().to(crud::update::<T>))
        .route("/{id}", web::delete().to(crud::remove::<T>))
}

/// Resource submitted as a multipart form with one optional file.
fn form_resource<T: Editable>(prefix: &str) -> Scope {
    web::scope(prefix)
        .route("", web::get().to(crud::list::<T>))
        .route("", web::post().to(forms::create::<T>))
        .route("/", web::get().to(crud::list::<T>))
        .route("/", web::post().to(forms::create::<T>))
        .route("/{id}", web::get().to(crud::get::<T>))
        .route("/{id}", web::put().to(forms::update::<T>))
        .route("/{id}", web::delete().to(crud::remove::<T>))
}

pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let upload_root = state.uploads.root().to_path_buf();

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::InvalidRequest(err.to_string()).into()
        }))
        // Health
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        // Admin
        .service(
            web::scope("/admin")
                .route("/register", web::post().to(admin::register))
                .route("/login", web::post().to(admin::login))
                .service(web::resource("/me").route(web::get().to(admin::me)).wrap(AuthMiddleware))
                .service(web::resource("").route(web::get().to(admin::list)).wrap(AuthMiddleware))
                .service(
                    web::resource("/{id}")
                        .route(web::delete().to(admin::delete))
                        .wrap(AuthMiddleware),
                ),
        )
        // Mail
        .route("/sendEmail", web::post().to(emails::send::<BookingEmail>))
        .route("/sendPurchaseEmail", web::post().to(emails::send::<PurchaseEmail>))
        .route("/sendRefundEmail", web::post().to(emails::send::<RefundEmail>))
        .route("/sendDonationEmail", web::post().to(emails::send::<DonationEmail>))
        .route("/returnProductsendEmail", web::post().to(emails::send::<ReturnEmail>))
        .route("/sendSubEmail", web::post().to(emails::send::<SubscriptionEmail>))
        // Nested aliases before their parents
        .service(form_resource::<EventParticipant>("/eventViews/eventParticipants"))
        .service(form_resource::<EventParticipant>("/eventBookingList"))
        .service(json_resource::<Event>("/events"))
        .service(json_resource::<Event>("/eventViews"))
        .service(form_resource::<Purchase>("/productViews/purchaseForm"))
        .service(form_resource::<Purchase>("/purchaseList"))
        .service(form_resource::<Product>("/products"))
        .service(form_resource::<Product>("/productViews"))
        .service(form_resource::<Refund>("/refunds"))
        .service(form_resource::<Refund>("/userRefunds"))
        .service(json_resource::<ProductReturn>("/returns"))
        .service(json_resource::<Ticket>("/tickets"))
        .service(json_resource::<Faq>("/faq"))
        .service(json_resource::<Donation>("/donations"))
        .service(json_resource::<Membership>("/memberships"))
        .service(json_resource::<Subscription>("/subscriptions"))
        // Stored attachments
        .service(Files::new("/uploads", upload_root));
}
