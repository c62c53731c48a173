//! Receipt scanning pipeline: prepare the captured image, run it through
//! the vision model, and hold the extracted result until the user confirms
//! or discards it.
//!
//! Every stage runs once; a failure anywhere is logged by the caller and
//! the flow simply never reaches confirmation.

use anyhow::{anyhow, Result};
use log::info;
use shared::{ConfirmScanRequest, InvoiceDetails, ScanReceiptResponse, Transaction};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::clients::vision::VisionClient;
use crate::domain::receipt_image::prepare_receipt_image;
use crate::domain::receipt_parser::parse_receipt_text;
use crate::domain::transaction_service::TransactionService;

/// Instruction sent to the vision model alongside every receipt image
const EXTRACTION_INSTRUCTION: &str = "Read this retail receipt. Transcribe the vendor name and \
address, the purchase date, each line item with its quantity and unit price, and the total \
amount. Reply with plain text only.";

/// An extraction awaiting user confirmation
#[derive(Debug, Clone)]
struct PendingScan {
    id: String,
    extracted_text: String,
    draft: Option<InvoiceDetails>,
}

#[derive(Clone)]
pub struct ScanService {
    vision: Arc<dyn VisionClient>,
    transaction_service: TransactionService,
    /// Single pending-scan slot; a new scan replaces an abandoned one
    pending: Arc<Mutex<Option<PendingScan>>>,
}

impl ScanService {
    pub fn new(vision: Arc<dyn VisionClient>, transaction_service: TransactionService) -> Self {
        Self {
            vision,
            transaction_service,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Run the capture through the pipeline: downscale/crop/encode, submit
    /// to the vision model, parse the reply, park the result for review.
    pub async fn scan_receipt(&self, image_bytes: &[u8]) -> Result<ScanReceiptResponse> {
        let prepared = prepare_receipt_image(image_bytes)?;
        info!("Prepared receipt image: {} bytes", prepared.len());

        let extracted_text = self
            .vision
            .extract_text(&prepared, EXTRACTION_INSTRUCTION)
            .await?;
        info!("Vision model returned {} characters", extracted_text.len());

        let draft = parse_receipt_text(&extracted_text);
        let scan_id = Uuid::new_v4().to_string();

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.take() {
            info!("Replacing abandoned scan {}", previous.id);
        }
        *pending = Some(PendingScan {
            id: scan_id.clone(),
            extracted_text: extracted_text.clone(),
            draft: draft.clone(),
        });

        Ok(ScanReceiptResponse {
            scan_id,
            extracted_text,
            draft,
        })
    }

    /// Turn a reviewed scan into a transaction. The pending entry is only
    /// dropped once the transaction has actually been stored.
    pub async fn confirm(&self, request: ConfirmScanRequest) -> Result<Transaction> {
        {
            let pending = self.pending.lock().unwrap();
            match pending.as_ref() {
                Some(scan) if scan.id == request.scan_id => {}
                _ => return Err(anyhow!("No pending scan with id {}", request.scan_id)),
            }
        }

        let transaction = self
            .transaction_service
            .create_transaction(request.transaction)
            .await?;

        let mut pending = self.pending.lock().unwrap();
        if pending.as_ref().map(|scan| scan.id == request.scan_id).unwrap_or(false) {
            *pending = None;
        }

        info!(
            "Confirmed scan {} as transaction {}",
            request.scan_id, transaction.id
        );
        Ok(transaction)
    }

    /// Drop a pending scan without creating anything
    pub fn discard(&self, scan_id: &str) -> Result<()> {
        let mut pending = self.pending.lock().unwrap();
        match pending.as_ref() {
            Some(scan) if scan.id == scan_id => {
                *pending = None;
                info!("Discarded scan {}", scan_id);
                Ok(())
            }
            _ => Err(anyhow!("No pending scan with id {}", scan_id)),
        }
    }

    /// The pending scan, if one is waiting for review
    pub fn pending_scan(&self) -> Option<ScanReceiptResponse> {
        self.pending.lock().unwrap().as_ref().map(|scan| ScanReceiptResponse {
            scan_id: scan.id.clone(),
            extracted_text: scan.extracted_text.clone(),
            draft: scan.draft.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::vision::VisionError;
    use crate::domain::session::{Session, SessionHandle};
    use crate::storage::csv::CsvConnection;
    use crate::storage::Connection;
    use async_trait::async_trait;
    use image::{DynamicImage, RgbImage};
    use shared::{CreateTransactionRequest, UserProfile};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct StubVisionClient {
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl VisionClient for StubVisionClient {
        async fn extract_text(
            &self,
            _image_jpeg: &[u8],
            _instruction: &str,
        ) -> Result<String, VisionError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(VisionError::EmptyResponse),
            }
        }
    }

    fn receipt_photo() -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            1600,
            1200,
            image::Rgb([230, 230, 230]),
        ));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn create_test_service(reply: Result<String, ()>) -> (ScanService, TempDir) {
        let temp = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp.path()).unwrap();
        let session = SessionHandle::new();
        session.set(Session {
            profile: UserProfile {
                id: "user-1".to_string(),
                email: "test@example.com".to_string(),
                display_name: None,
            },
            id_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
        });

        let transaction_service =
            TransactionService::new(connection.create_transaction_store(), session);
        let service = ScanService::new(Arc::new(StubVisionClient { reply }), transaction_service);
        (service, temp)
    }

    #[tokio::test]
    async fn test_scan_produces_pending_entry_with_draft() {
        let text = "Corner Market\nBread 2 x 2.50\nTOTAL: 5.00\n".to_string();
        let (service, _temp) = create_test_service(Ok(text.clone()));

        let response = service.scan_receipt(&receipt_photo()).await.unwrap();

        assert_eq!(response.extracted_text, text);
        assert_eq!(response.draft.as_ref().unwrap().vendor, "Corner Market");
        assert_eq!(service.pending_scan().map(|s| s.extracted_text), Some(text));
    }

    #[tokio::test]
    async fn test_failed_extraction_leaves_no_pending_scan() {
        let (service, _temp) = create_test_service(Err(()));

        let result = service.scan_receipt(&receipt_photo()).await;
        assert!(result.is_err());
        assert!(service.pending_scan().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_image_fails_before_the_model_call() {
        let (service, _temp) = create_test_service(Ok("unused".to_string()));

        let result = service.scan_receipt(b"garbage bytes").await;
        assert!(result.is_err());
        assert!(service.pending_scan().is_none());
    }

    #[tokio::test]
    async fn test_confirm_creates_transaction_and_clears_pending() {
        let (service, _temp) = create_test_service(Ok("TOTAL: 15.00\n".to_string()));

        let scan = service.scan_receipt(&receipt_photo()).await.unwrap();
        let transaction = service
            .confirm(ConfirmScanRequest {
                scan_id: scan.scan_id.clone(),
                transaction: CreateTransactionRequest {
                    amount: 15.0,
                    category: "Shopping".to_string(),
                    is_expense: true,
                    date: None,
                    description: Some("Corner Market".to_string()),
                    invoice: scan.draft,
                },
            })
            .await
            .unwrap();

        assert_eq!(transaction.amount, 15.0);
        assert!(service.pending_scan().is_none());

        // Second confirmation of the same scan must fail
        let again = service
            .confirm(ConfirmScanRequest {
                scan_id: scan.scan_id,
                transaction: CreateTransactionRequest {
                    amount: 15.0,
                    category: "Shopping".to_string(),
                    is_expense: true,
                    date: None,
                    description: None,
                    invoice: None,
                },
            })
            .await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn test_confirm_with_invalid_input_keeps_pending_scan() {
        let (service, _temp) = create_test_service(Ok("TOTAL: 15.00\n".to_string()));

        let scan = service.scan_receipt(&receipt_photo()).await.unwrap();
        let result = service
            .confirm(ConfirmScanRequest {
                scan_id: scan.scan_id,
                transaction: CreateTransactionRequest {
                    amount: -1.0,
                    category: "Shopping".to_string(),
                    is_expense: true,
                    date: None,
                    description: None,
                    invoice: None,
                },
            })
            .await;

        assert!(result.is_err());
        assert!(service.pending_scan().is_some());
    }

    #[tokio::test]
    async fn test_new_scan_replaces_abandoned_one() {
        let (service, _temp) = create_test_service(Ok("TOTAL: 1.00\n".to_string()));

        let first = service.scan_receipt(&receipt_photo()).await.unwrap();
        let second = service.scan_receipt(&receipt_photo()).await.unwrap();

        assert_ne!(first.scan_id, second.scan_id);
        assert!(service.discard(&first.scan_id).is_err());
        assert!(service.discard(&second.scan_id).is_ok());
    }
}
