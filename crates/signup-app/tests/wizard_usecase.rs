mod support;

use signup_app::AdvanceError;
use signup_core::fields::FieldName;
use signup_core::strength::StrengthLabel;
use signup_core::validate::FieldErrorKind;

use support::{fill_credential, fill_identity, scripted_wizard};

#[test]
fn blank_required_field_blocks_advance_with_error_for_that_field_only() {
    for blank in [FieldName::FirstName, FieldName::LastName, FieldName::Email] {
        let (mut wizard, _service, _sink) = scripted_wizard();
        fill_identity(&mut wizard);
        wizard.set_field(blank, "");

        let Err(AdvanceError::Incomplete(error)) = wizard.advance() else {
            panic!("advance should fail for blank {blank}");
        };

        assert_eq!(wizard.current_step(), 1);
        assert_eq!(error.field_errors.len(), 1);
        let message = &wizard.error_for(blank).expect("field error").message;
        assert!(!message.is_empty());
        assert_eq!(wizard.errors().len(), 1, "only {blank} should fail");
    }
}

#[test]
fn empty_identity_step_collects_all_errors_in_one_pass() {
    let (mut wizard, _service, _sink) = scripted_wizard();

    wizard.advance().expect_err("advance should fail");

    assert_eq!(wizard.errors().len(), 3);
    assert_eq!(wizard.current_step(), 1);
}

#[test]
fn complete_identity_advances_and_leaves_no_errors() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    fill_identity(&mut wizard);

    assert_eq!(wizard.advance(), Ok(2));
    assert!(wizard.errors().is_empty());
}

#[test]
fn editing_a_field_clears_only_its_error_without_revalidating() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    wizard.advance().expect_err("advance should fail");

    wizard.set_field(FieldName::Email, "still not an email");

    assert!(wizard.error_for(FieldName::Email).is_none());
    assert!(wizard.error_for(FieldName::FirstName).is_some());
    assert!(wizard.error_for(FieldName::LastName).is_some());
}

#[test]
fn setting_same_value_twice_without_errors_keeps_errors_empty() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    wizard.set_field(FieldName::FirstName, "Ada");
    wizard.set_field(FieldName::FirstName, "Ada");
    assert!(wizard.errors().is_empty());
}

#[test]
fn short_password_scores_three_but_is_rejected_for_length() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    fill_identity(&mut wizard);
    wizard.advance().expect("identity step");
    fill_credential(&mut wizard, "abcABC1");

    let strength = wizard.strength();
    assert_eq!(strength.score, 3);

    wizard.advance().expect_err("credential step should fail");
    let error = wizard.error_for(FieldName::Password).expect("password error");
    assert_eq!(error.kind, FieldErrorKind::Format);
    assert!(error.message.contains("at least 8"));
    assert!(wizard.error_for(FieldName::ConfirmPassword).is_none());
    assert_eq!(wizard.current_step(), 2);
}

#[test]
fn eight_character_password_without_special_passes_and_scores_four() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    fill_identity(&mut wizard);
    wizard.advance().expect("identity step");
    fill_credential(&mut wizard, "Abcdefg1");

    assert_eq!(wizard.strength().score, 4);
    assert_eq!(wizard.strength().label, StrengthLabel::Excellent);
    assert_eq!(wizard.advance(), Ok(3));
}

#[test]
fn confirmation_mismatch_blocks_even_strong_passwords() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    fill_identity(&mut wizard);
    wizard.advance().expect("identity step");
    wizard.set_field(FieldName::Password, "Sup3r$ecret!");
    wizard.set_field(FieldName::ConfirmPassword, "Sup3r$ecret?");

    wizard.advance().expect_err("credential step should fail");

    let error = wizard
        .error_for(FieldName::ConfirmPassword)
        .expect("confirm error");
    assert_eq!(error.kind, FieldErrorKind::Mismatch);
    assert!(wizard.error_for(FieldName::Password).is_none());
}

#[test]
fn retreat_keeps_current_errors_and_floors_at_one() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    fill_identity(&mut wizard);
    wizard.advance().expect("identity step");
    wizard.advance().expect_err("credential step should fail");
    let errors = wizard.errors().clone();
    assert!(!errors.is_empty());

    assert_eq!(wizard.retreat(), 1);
    assert_eq!(wizard.errors(), &errors);
    assert_eq!(wizard.retreat(), 1);
}

#[test]
fn advancing_clears_errors_owned_by_the_passed_step() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    fill_identity(&mut wizard);
    wizard.advance().expect("identity step");
    wizard.advance().expect_err("credential step should fail");
    wizard.retreat();

    assert_eq!(wizard.advance(), Ok(2));
    assert!(wizard.error_for(FieldName::Password).is_some());
    assert!(wizard.error_for(FieldName::FirstName).is_none());
}

#[test]
fn account_request_trims_identity_but_not_password() {
    let (mut wizard, _service, _sink) = scripted_wizard();
    wizard.set_field(FieldName::FirstName, "  Ada ");
    wizard.set_field(FieldName::LastName, "Lovelace");
    wizard.set_field(FieldName::Email, " ada@example.com");
    wizard.set_field(FieldName::Password, " Abcdefg1 ");

    let request = wizard.account_request();
    assert_eq!(request.first_name, "Ada");
    assert_eq!(request.email, "ada@example.com");
    assert_eq!(request.password, " Abcdefg1 ");
    assert_eq!(wizard.advance(), Ok(2));
}
