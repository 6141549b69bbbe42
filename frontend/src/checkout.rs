//! 购买流程
//!
//! 创建订单 -> (免费) 直接完成 / (付费) 打开支付组件 -> 回调载荷原样提交后端校验。
//! 支付组件通过 `PaymentGateway` trait 注入，浏览器中为 Razorpay。

use codemart_shared::{
    CURRENCY, CreateOrderResponse, PaymentVerification, Product, VerifyResponse, to_minor_units,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::CodeMartApi;
use crate::error::{ApiError, ApiResult};
use crate::serde_helper;
use crate::web::HttpTransport;

const THEME_COLOR: &str = "#667eea";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// 付费订单缺少支付参数
    #[error("order {0} is missing payment parameters")]
    Incomplete(String),
    #[error("payment widget error: {0}")]
    Gateway(String),
    #[error(transparent)]
    Bridge(#[from] serde_helper::Error),
}

impl CheckoutError {
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            CheckoutError::Api(e) => e.message_or(fallback),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutTheme {
    pub color: &'static str,
}

/// 传给支付组件的配置，`amount` 为最小货币单位
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: &'static str,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub theme: CheckoutTheme,
}

/// 创建订单之后的下一步
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseStep {
    /// 免费订单已完成，无需支付
    Fulfilled { order_id: String },
    /// 需要打开支付组件
    Checkout(CheckoutOptions),
}

impl PurchaseStep {
    pub fn from_response(
        res: CreateOrderResponse,
        brand: &str,
        description: &str,
    ) -> Result<Self, CheckoutError> {
        if res.is_free {
            return Ok(PurchaseStep::Fulfilled {
                order_id: res.order_id,
            });
        }

        let (Some(key), Some(amount), Some(gateway_order)) =
            (res.razorpay_key, res.amount, res.razorpay_order_id)
        else {
            return Err(CheckoutError::Incomplete(res.order_id));
        };

        Ok(PurchaseStep::Checkout(CheckoutOptions {
            key,
            amount: to_minor_units(amount),
            currency: CURRENCY,
            name: brand.to_string(),
            description: description.to_string(),
            order_id: gateway_order,
            theme: CheckoutTheme { color: THEME_COLOR },
        }))
    }
}

/// 支付成功回调
pub type PaymentHandler = Box<dyn FnOnce(PaymentVerification)>;

pub trait PaymentGateway {
    /// 打开支付组件；用户完成支付后调用 `on_success`
    fn open(&self, options: &CheckoutOptions, on_success: PaymentHandler)
    -> Result<(), CheckoutError>;
}

// =========================================================
// 实现层: Razorpay Checkout
// =========================================================

#[wasm_bindgen]
extern "C" {
    /// `index.html` 中通过 `<script>` 加载的 `window.Razorpay`
    type Razorpay;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> Result<Razorpay, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn open(this: &Razorpay) -> Result<(), JsValue>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RazorpayGateway;

impl PaymentGateway for RazorpayGateway {
    fn open(
        &self,
        options: &CheckoutOptions,
        on_success: PaymentHandler,
    ) -> Result<(), CheckoutError> {
        let js_options = serde_helper::to_value(options)?;

        let handler = Closure::once_into_js(move |payload: JsValue| {
            match serde_helper::from_value::<PaymentVerification>(payload) {
                Ok(payment) => on_success(payment),
                Err(e) => log_error!("[Checkout] Unreadable payment payload: {}", e),
            }
        });
        serde_helper::set_property(&js_options, "handler", &handler)?;

        let widget =
            Razorpay::new(&js_options).map_err(|e| CheckoutError::Gateway(format!("{:?}", e)))?;
        widget
            .open()
            .map_err(|e| CheckoutError::Gateway(format!("{:?}", e)))
    }
}

// =========================================================
// 流程
// =========================================================

/// 为商品创建订单，付费时打开支付组件
///
/// 返回 `Fulfilled` 时支付组件从未被打开。
pub async fn start_checkout<T: HttpTransport, G: PaymentGateway>(
    api: &CodeMartApi<T>,
    gateway: &G,
    product: &Product,
    coupon_code: &str,
    brand: &str,
    on_paid: PaymentHandler,
) -> Result<PurchaseStep, CheckoutError> {
    let response = api
        .create_order(&product.id, Some(coupon_code.to_string()))
        .await?;
    let step = PurchaseStep::from_response(response, brand, &product.base.title)?;

    match &step {
        PurchaseStep::Fulfilled { order_id } => {
            log_info!("[Checkout] Free order {} fulfilled", order_id);
        }
        PurchaseStep::Checkout(options) => {
            log_info!(
                "[Checkout] Opening payment for {} ({} minor units)",
                options.order_id,
                options.amount
            );
            gateway.open(options, on_paid)?;
        }
    }

    Ok(step)
}

/// 将支付组件回调载荷原样提交后端校验
pub async fn confirm_payment<T: HttpTransport>(
    api: &CodeMartApi<T>,
    payment: &PaymentVerification,
) -> ApiResult<VerifyResponse> {
    api.verify_payment(payment).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{api_with, product_json, url};
    use crate::web::HttpMethod;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 记录打开次数，并可模拟用户完成支付
    #[derive(Default)]
    struct MockGateway {
        opened: RefCell<Vec<CheckoutOptions>>,
        handler: RefCell<Option<PaymentHandler>>,
    }

    impl MockGateway {
        fn complete(&self, payment: PaymentVerification) {
            let handler = self.handler.borrow_mut().take().unwrap();
            handler(payment);
        }
    }

    impl PaymentGateway for MockGateway {
        fn open(
            &self,
            options: &CheckoutOptions,
            on_success: PaymentHandler,
        ) -> Result<(), CheckoutError> {
            self.opened.borrow_mut().push(options.clone());
            *self.handler.borrow_mut() = Some(on_success);
            Ok(())
        }
    }

    fn product(price: f64) -> Product {
        serde_json::from_value(product_json("p1", price)).unwrap()
    }

    fn noop() -> PaymentHandler {
        Box::new(|_| {})
    }

    #[tokio::test]
    async fn test_free_order_never_opens_widget() {
        let api = api_with(Some("tok"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/create?product_id=p1"),
            200,
            json!({ "order_id": "o1", "is_free": true }),
        );
        let gateway = MockGateway::default();

        let step = start_checkout(&api, &gateway, &product(0.0), "", "CodeMart", noop())
            .await
            .unwrap();

        assert_eq!(
            step,
            PurchaseStep::Fulfilled {
                order_id: "o1".into()
            }
        );
        assert!(gateway.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_codestore_checkout_posts_project_body() {
        let api = crate::api::tests::codestore_api(Some("admin-tok"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/create"),
            200,
            json!({ "order_id": "o9", "is_free": true }),
        );
        let gateway = MockGateway::default();

        let step = start_checkout(&api, &gateway, &product(0.0), "", "CodeStore", noop())
            .await
            .unwrap();

        assert_eq!(step, PurchaseStep::Fulfilled { order_id: "o9".into() });
        assert_eq!(
            api.transport().recorded()[0].json(),
            json!({ "project_id": "p1" })
        );
    }

    #[tokio::test]
    async fn test_priced_order_opens_widget_with_minor_units() {
        let api = api_with(Some("tok"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/create?product_id=p1&coupon_code=SAVE10"),
            200,
            json!({
                "order_id": "o2",
                "is_free": false,
                "razorpay_order_id": "order_RZ1",
                "amount": 449.1,
                "razorpay_key": "rzp_test_key"
            }),
        );
        let gateway = MockGateway::default();

        start_checkout(&api, &gateway, &product(499.0), " SAVE10 ", "CodeMart", noop())
            .await
            .unwrap();

        let opened = gateway.opened.borrow();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].amount, 44910);
        assert_eq!(opened[0].currency, "INR");
        assert_eq!(opened[0].key, "rzp_test_key");
        assert_eq!(opened[0].order_id, "order_RZ1");
        assert_eq!(opened[0].name, "CodeMart");
        assert_eq!(opened[0].description, "Project p1");
    }

    #[tokio::test]
    async fn test_widget_payload_is_verified_verbatim() {
        let api = api_with(Some("tok"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/create?product_id=p1"),
            200,
            json!({
                "order_id": "o3",
                "razorpay_order_id": "order_RZ2",
                "amount": 10,
                "razorpay_key": "k"
            }),
        );
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/verify"),
            200,
            json!({ "message": "Payment verified", "license_key": "LIC-1" }),
        );
        let gateway = MockGateway::default();
        let received = Rc::new(RefCell::new(None));
        let sink = received.clone();

        start_checkout(
            &api,
            &gateway,
            &product(10.0),
            "",
            "CodeMart",
            Box::new(move |payment| *sink.borrow_mut() = Some(payment)),
        )
        .await
        .unwrap();

        let payment = PaymentVerification {
            razorpay_order_id: "order_RZ2".into(),
            razorpay_payment_id: "pay_9".into(),
            razorpay_signature: "sig_9".into(),
        };
        gateway.complete(payment.clone());
        let payment = received.borrow_mut().take().unwrap();

        let verified = confirm_payment(&api, &payment).await.unwrap();
        assert_eq!(verified.license_key.as_deref(), Some("LIC-1"));

        let requests = api.transport().recorded();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].json(),
            json!({
                "razorpay_order_id": "order_RZ2",
                "razorpay_payment_id": "pay_9",
                "razorpay_signature": "sig_9"
            })
        );
    }

    #[tokio::test]
    async fn test_incomplete_priced_order_is_rejected() {
        let api = api_with(Some("tok"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/create?product_id=p1"),
            200,
            json!({ "order_id": "o4", "is_free": false }),
        );
        let gateway = MockGateway::default();

        let err = start_checkout(&api, &gateway, &product(5.0), "", "CodeMart", noop())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Incomplete(ref id) if id == "o4"));
        assert_eq!(err.message_or("Purchase failed"), "Purchase failed");
        assert!(gateway.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_backend_detail_is_surfaced() {
        let api = api_with(Some("tok"));
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/orders/create?product_id=p1&coupon_code=BAD"),
            400,
            json!({ "detail": "Invalid coupon" }),
        );
        let gateway = MockGateway::default();

        let err = start_checkout(&api, &gateway, &product(5.0), "BAD", "CodeMart", noop())
            .await
            .unwrap_err();

        assert_eq!(err.message_or("Purchase failed"), "Invalid coupon");
        assert!(gateway.opened.borrow().is_empty());
    }
}
