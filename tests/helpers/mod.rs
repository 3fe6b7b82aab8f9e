pub mod mock_webhook;
