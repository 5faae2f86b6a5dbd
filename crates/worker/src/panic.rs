use std::any::Any;

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_string()
	}
}

#[cfg(test)]
mod tests {
	use std::panic;

	use super::panic_message;

	#[test]
	fn extracts_static_str_payload() {
		let result: std::thread::Result<()> = panic::catch_unwind(|| panic!("boom-str"));
		let payload = result.unwrap_err();
		assert_eq!(panic_message(payload.as_ref()), "boom-str");
	}

	#[test]
	fn extracts_string_payload() {
		let result: std::thread::Result<()> = panic::catch_unwind(|| panic!("{}", String::from("boom-string")));
		let payload = result.unwrap_err();
		assert_eq!(panic_message(payload.as_ref()), "boom-string");
	}

	#[test]
	fn falls_back_for_opaque_payload() {
		let result: std::thread::Result<()> = panic::catch_unwind(|| panic::panic_any(42u8));
		let payload = result.unwrap_err();
		assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
	}
}
