mod mosaic_planner_tests;
