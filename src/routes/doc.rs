use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddCartLineRequest, CartList},
        compliments::{
            ComplimentAssignment, ComplimentList, CreateComplimentRequest, SendComplimentsRequest,
            SendComplimentsResponse,
        },
        orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems, SetCompletionRequest},
        payments::{CreatePaymentIntentRequest, PaymentIntentResponse, PurchaseEmailRequest, ReceiptItem},
        stores::{NewStoreItem, ReplaceStoreRequest, StoreList, StoreWithItems},
        users::{CreateUserRequest, UserList},
    },
    models::{CartLine, Compliment, Order, OrderItem, Store, StoreItem, User},
    response::{ApiResponse, Meta},
    routes::{cart, compliments, health, orders, params, payments, stores, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::create_user,
        users::list_users,
        users::get_user,
        users::delete_user,
        stores::get_store,
        stores::replace_store,
        stores::delete_store,
        stores::add_item,
        stores::update_item,
        stores::remove_item,
        stores::list_stores,
        stores::get_store_by_id,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        compliments::create_compliments,
        compliments::send_compliments,
        compliments::list_compliments,
        orders::checkout,
        orders::list_orders,
        orders::list_patron_orders,
        orders::delete_order,
        orders::mark_ready,
        orders::mark_ready_in_10,
        orders::set_item_completion,
        payments::create_payment_intent,
        payments::send_purchase_email
    ),
    components(
        schemas(
            User,
            Store,
            StoreItem,
            CartLine,
            Compliment,
            Order,
            OrderItem,
            CreateUserRequest,
            UserList,
            ReplaceStoreRequest,
            NewStoreItem,
            StoreWithItems,
            StoreList,
            AddCartLineRequest,
            CartList,
            CreateComplimentRequest,
            ComplimentList,
            SendComplimentsRequest,
            ComplimentAssignment,
            SendComplimentsResponse,
            CheckoutRequest,
            CheckoutResponse,
            OrderWithItems,
            OrderList,
            SetCompletionRequest,
            CreatePaymentIntentRequest,
            PaymentIntentResponse,
            PurchaseEmailRequest,
            ReceiptItem,
            params::Pagination,
            Meta,
            ApiResponse<User>,
            ApiResponse<StoreWithItems>,
            ApiResponse<CartList>,
            ApiResponse<ComplimentList>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<OrderList>,
            ApiResponse<PaymentIntentResponse>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "User account endpoints"),
        (name = "Stores", description = "Store catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Compliments", description = "Promotional compliment endpoints"),
        (name = "Orders", description = "Checkout, kitchen and order history endpoints"),
        (name = "Payments", description = "Payment intent and receipt email endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
