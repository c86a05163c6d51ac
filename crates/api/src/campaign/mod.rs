pub mod auto_close_campaigns;
