#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use signup_app::{
    AccountCreationService, AccountRequest, CreationEvent, NotificationSink, WizardController,
};
use signup_core::fields::FieldName;

#[derive(Default)]
pub struct ScriptedAccountService {
    requests: Mutex<Vec<(u64, AccountRequest)>>,
    senders: Mutex<Vec<Sender<CreationEvent>>>,
}

impl ScriptedAccountService {
    pub fn requests(&self) -> Vec<(u64, AccountRequest)> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn complete(&self, event: CreationEvent) {
        let sender = self
            .senders
            .lock()
            .expect("senders lock")
            .last()
            .cloned()
            .expect("sender should exist");
        sender.send(event).expect("send creation event");
    }
}

impl AccountCreationService for ScriptedAccountService {
    fn spawn_create(&self, request: AccountRequest, token: u64) -> Receiver<CreationEvent> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((token, request));
        let (sender, receiver) = mpsc::channel();
        self.senders.lock().expect("senders lock").push(sender);
        receiver
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }
}

impl NotificationSink for RecordingSink {
    fn show(&self, message: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push(message.to_string());
    }
}

pub fn scripted_wizard() -> (
    WizardController,
    Arc<ScriptedAccountService>,
    Arc<RecordingSink>,
) {
    let service = Arc::new(ScriptedAccountService::default());
    let sink = Arc::new(RecordingSink::default());
    let wizard = WizardController::new(service.clone(), sink.clone(), Duration::from_secs(30));
    (wizard, service, sink)
}

pub fn fill_identity(wizard: &mut WizardController) {
    wizard.set_field(FieldName::FirstName, "Ada");
    wizard.set_field(FieldName::LastName, "Lovelace");
    wizard.set_field(FieldName::Email, "ada@example.com");
}

pub fn fill_credential(wizard: &mut WizardController, password: &str) {
    wizard.set_field(FieldName::Password, password);
    wizard.set_field(FieldName::ConfirmPassword, password);
}

pub fn advance_to_confirmation(wizard: &mut WizardController) {
    fill_identity(wizard);
    wizard.advance().expect("identity step");
    fill_credential(wizard, "Abcdefg1");
    wizard.advance().expect("credential step");
    assert_eq!(wizard.current_step(), 3);
}
