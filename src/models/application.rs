// src/models/application.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

// ---
// 1. Formulário de abertura de conta (primeira tela do assistente)
// ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_delivery_emails"))]
pub struct AccountOpeningForm {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Trading")]
    pub business_category: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Tech Solutions Mauritius Ltd")]
    pub entity_name: String,

    #[schema(example = "C07012345")]
    pub brn: String,
    pub incorporation_no: String,
    #[schema(example = "2020-03-15")]
    pub incorporation_date: String,
    pub country_of_incorporation: String,
    pub registered_address: String,
    pub country: String,
    pub is_different_correspondence_address: bool,
    pub correspondence_address: String,
    pub countries_of_operation: Vec<String>,
    pub account_type: String,
    #[schema(example = "USD")]
    pub currency: String,
    pub initial_deposit: String,
    pub source_of_funds: String,
    pub purpose_of_account: String,
    pub source_of_accumulated_wealth: Vec<String>,
    pub chequebook_order: String,
    pub chequebook_books: String,
    pub chequebook_leaves: String,
    pub chequebook_collection: String,
    pub swift_copy_delivery: bool,
    pub swift_delivery_email: String,
    pub estatement_email: String,
}

// Os e-mails só são obrigatórios quando a opção correspondente está marcada
fn validate_delivery_emails(form: &AccountOpeningForm) -> Result<(), ValidationError> {
    if form.swift_copy_delivery && !form.swift_delivery_email.validate_email() {
        let mut err = ValidationError::new("invalid_email");
        err.message = Some("swiftDeliveryEmail must be a valid e-mail".into());
        return Err(err);
    }
    if !form.estatement_email.is_empty() && !form.estatement_email.validate_email() {
        let mut err = ValidationError::new("invalid_email");
        err.message = Some("estatementEmail must be a valid e-mail".into());
        return Err(err);
    }
    if form.is_different_correspondence_address && form.correspondence_address.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("correspondenceAddress is required".into());
        return Err(err);
    }
    Ok(())
}

// ---
// 2. Formato esperado pelo endpoint de customer details
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerDetailsPayload {
    pub application_id: String,
    pub business_category: String,
    pub entity_name: String,
    pub brn: String,
    pub incorporation_no: String,
    pub incorporation_date: String,
    pub country_of_incorporation: String,
    pub registered_address: String,
    pub country: String,
    pub is_different_correspondence_address: bool,
    pub correspondence_address: String,
    pub countries_of_operation: Vec<String>,
    pub account_type: String,
    pub currency: String,
    pub initial_deposit: String,
    pub source_of_funds: String,
    pub purpose_of_account: String,
    pub source_of_accumulated_wealth: Vec<String>,
    pub chequebook_order: String,
    pub chequebook_books: String,
    pub chequebook_leaves: String,
    pub chequebook_collection: String,
    pub swift_copy_delivery: bool,
    pub swift_delivery_email: String,
    pub estatement_email: String,
}

impl CustomerDetailsPayload {
    pub fn from_form(form: AccountOpeningForm, application_id: &str) -> Self {
        Self {
            application_id: application_id.to_string(),
            business_category: form.business_category,
            entity_name: form.entity_name,
            brn: form.brn,
            incorporation_no: form.incorporation_no,
            incorporation_date: form.incorporation_date,
            country_of_incorporation: form.country_of_incorporation,
            registered_address: form.registered_address,
            country: form.country,
            is_different_correspondence_address: form.is_different_correspondence_address,
            correspondence_address: form.correspondence_address,
            countries_of_operation: form.countries_of_operation,
            account_type: form.account_type,
            currency: form.currency,
            initial_deposit: form.initial_deposit,
            source_of_funds: form.source_of_funds,
            purpose_of_account: form.purpose_of_account,
            source_of_accumulated_wealth: form.source_of_accumulated_wealth,
            chequebook_order: form.chequebook_order,
            chequebook_books: form.chequebook_books,
            chequebook_leaves: form.chequebook_leaves,
            chequebook_collection: form.chequebook_collection,
            swift_copy_delivery: form.swift_copy_delivery,
            swift_delivery_email: form.swift_delivery_email,
            estatement_email: form.estatement_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> AccountOpeningForm {
        AccountOpeningForm {
            business_category: "Trading".into(),
            entity_name: "Tech Solutions Mauritius Ltd".into(),
            brn: "C07012345".into(),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_form_is_valid() {
        assert!(filled_form().validate().is_ok());
    }

    #[test]
    fn swift_delivery_requires_an_email() {
        let mut form = filled_form();
        form.swift_copy_delivery = true;
        assert!(form.validate().is_err());

        form.swift_delivery_email = "ops@tech.mu".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn missing_entity_name_is_rejected() {
        let mut form = filled_form();
        form.entity_name.clear();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("entity_name"));
    }

    #[test]
    fn payload_carries_the_application_id() {
        let payload = CustomerDetailsPayload::from_form(filled_form(), "77");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["application_id"], "77");
        assert_eq!(json["entity_name"], "Tech Solutions Mauritius Ltd");
        assert_eq!(json["swift_copy_delivery"], false);
    }
}
