//! Заказ выписки по счёту: HKKAZ на выход, HIKAZ + декодер MT940 на входе.

use crate::{
    config::FintsConfig,
    error::Result,
    formats::mt940::Mt940,
    interaction::{check_order_support, ClientResponse, OrderParams},
    message::Message,
    segment::{AccountRef, Hikaz, Hkkaz, Segment, SegmentPayload},
    traits::ReadFormat,
};
use chrono::NaiveDate;
use std::io::Cursor;

#[derive(Debug, Clone)]
pub struct StatementInteraction {
    pub account_number: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub order: OrderParams,
}

impl StatementInteraction {
    pub fn new(
        account_number: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        StatementInteraction {
            account_number: account_number.into(),
            from,
            to,
            order: OrderParams {
                request_seg_id: Hkkaz::ID,
                response_seg_id: Hikaz::ID,
            },
        }
    }

    pub fn build_request(&self, config: &FintsConfig) -> Result<Vec<Segment>> {
        let (account, version) =
            check_order_support(config, &self.account_number, self.order.request_seg_id)?;

        let hkkaz = Hkkaz {
            account: AccountRef {
                account_number: account.account_number.clone(),
                sub_account_id: account.sub_account_id.clone(),
                bank: account.bank.clone(),
            },
            all_accounts: false,
            from: self.from,
            to: self.to,
        };

        Ok(vec![Segment::new(
            self.order.request_seg_id,
            version,
            SegmentPayload::Hkkaz(hkkaz),
        )])
    }

    pub fn consume_response(
        &self,
        _config: &mut FintsConfig,
        response: &Message,
        client_response: &mut ClientResponse,
    ) -> Result<()> {
        match response
            .find_segment(self.order.response_seg_id)
            .and_then(|s| s.as_hikaz())
        {
            Some(hikaz) => {
                client_response.statements = Mt940::read(Cursor::new(hikaz.booked.as_str()))?;
                tracing::debug!(
                    account = %self.account_number,
                    statements = client_response.statements.len(),
                    "booked statements decoded"
                );
            }
            None => client_response.statements = Vec::new(),
        }
        Ok(())
    }
}
