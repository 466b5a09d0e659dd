//! REST path templates, relative to the configured base URL.

pub const REGISTER: &str = "/auth/register";
pub const LOGIN: &str = "/auth/login";
pub const VERIFY_OTP: &str = "/auth/verify-otp";
pub const LOGOUT: &str = "/auth/logout";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";
pub const CATEGORIES: &str = "/categories";
pub const PRODUCTS: &str = "/products";
pub const PRODUCT: &str = "/products/{id}";
pub const ORDERS: &str = "/orders";
pub const VENDOR_SETUP: &str = "/vendors/setup";

pub fn product(id: &str) -> String {
    PRODUCT.replace("{id}", id)
}
