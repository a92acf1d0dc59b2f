pub mod tt_fetch;
