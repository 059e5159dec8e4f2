mod test_admin;
mod test_feed;
mod test_pages;
